use std::sync::Arc;

use stockwidget_core::{
    cache::{FileCacheStorage, QuoteCache},
    calendar::MarketCalendar,
    updater::{QuoteUpdateService, UpdateScheduler},
    utils::SystemClock,
    widgets::WidgetHost,
};
use stockwidget_market_data::FinnhubFetcher;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, prefs::PrefsStore, scheduler, widget_host::TextWidgetHost};

pub struct AppState {
    pub cache: Arc<QuoteCache>,
    pub prefs: Arc<PrefsStore>,
    pub widget_host: Arc<TextWidgetHost>,
    pub scheduler: UpdateScheduler,
    pub calendar: MarketCalendar,
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory in use: {}", config.data_dir.display());

    let prefs = Arc::new(PrefsStore::open(config.prefs_path())?);

    let storage = Arc::new(FileCacheStorage::new(config.quote_cache_path()));
    let cache = Arc::new(QuoteCache::persisted(storage));
    let loaded = cache.load();
    tracing::info!("Restored {} cached quotes", loaded);

    let widget_host = Arc::new(TextWidgetHost::new(prefs.clone(), cache.clone()));
    let calendar = MarketCalendar::new(config.exchange_tz);
    let fetcher = Arc::new(FinnhubFetcher::with_base_url(config.provider_url.clone()));

    let service = Arc::new(QuoteUpdateService::new(
        cache.clone(),
        calendar,
        fetcher,
        prefs.clone(),
        prefs.clone(),
        widget_host.clone(),
        Arc::new(SystemClock),
    ));
    let scheduler = UpdateScheduler::start(service);

    let state = Arc::new(AppState {
        cache,
        prefs,
        widget_host,
        scheduler,
        calendar,
    });

    // Show cached data right away, then keep it fresh
    state.widget_host.notify_widgets_to_refresh();
    scheduler::sync_recurring_updates(&state);

    Ok(state)
}
