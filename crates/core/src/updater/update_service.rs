use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use stockwidget_market_data::{synthesize_quote, Quote, QuoteFetcher};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CycleOutcome, CyclePhase, CycleReport, RetryableError};
use crate::cache::QuoteCache;
use crate::calendar::MarketCalendar;
use crate::errors::Result;
use crate::settings::{SettingsStore, TrackedSymbols};
use crate::status::StatusLog;
use crate::utils::Clock;
use crate::widgets::WidgetHost;

/// Runs update cycles.
///
/// One cycle records the attempt, checks market hours (unless forced),
/// prunes removed widgets and stale cache entries, fetches every tracked
/// symbol, and refreshes the widgets when the outcome warrants it.
///
/// Cycles are serialized: a cycle requested while another runs waits for it.
pub struct QuoteUpdateService {
    cache: Arc<QuoteCache>,
    calendar: MarketCalendar,
    fetcher: Arc<dyn QuoteFetcher>,
    settings: Arc<dyn SettingsStore>,
    status: Arc<dyn StatusLog>,
    host: Arc<dyn WidgetHost>,
    clock: Arc<dyn Clock>,
    cycle_lock: Mutex<()>,
}

impl QuoteUpdateService {
    pub fn new(
        cache: Arc<QuoteCache>,
        calendar: MarketCalendar,
        fetcher: Arc<dyn QuoteFetcher>,
        settings: Arc<dyn SettingsStore>,
        status: Arc<dyn StatusLog>,
        host: Arc<dyn WidgetHost>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            calendar,
            fetcher,
            settings,
            status,
            host,
            clock,
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    pub fn calendar(&self) -> &MarketCalendar {
        &self.calendar
    }

    /// Runs one cycle. `forced` skips the market-hours gate.
    ///
    /// Per-symbol fetch failures are reported in the returned [`CycleReport`].
    /// Only failures of the cycle itself surface as [`RetryableError`].
    pub async fn run_cycle(&self, forced: bool) -> std::result::Result<CycleReport, RetryableError> {
        let _running = self.cycle_lock.lock().await;
        let cycle_id = Uuid::new_v4();

        match self.execute(cycle_id, forced).await {
            Ok(report) => {
                info!(
                    "[cycle {}] finished: outcome={:?} succeeded={} failed={} propagated={}",
                    cycle_id,
                    report.outcome,
                    report.succeeded.len(),
                    report.failed.len(),
                    report.propagated
                );
                Ok(report)
            }
            Err(e) => {
                error!("[cycle {}] aborted: {}", cycle_id, e);
                Err(RetryableError::new(cycle_id, e))
            }
        }
    }

    async fn execute(&self, id: Uuid, forced: bool) -> Result<CycleReport> {
        let mut report = CycleReport::new(id, forced);

        self.enter(id, CyclePhase::CheckGate);
        let now = self.clock.now();
        self.record(id, "attempt", self.status.record_attempt(now));

        if !forced {
            let interval = self.settings.refresh_interval_minutes()?;
            if !self.calendar.is_open(now, interval) {
                debug!("[cycle {}] outside market hours, skipping", id);
                report.outcome = CycleOutcome::MarketClosed;
                self.enter(id, CyclePhase::Idle);
                return Ok(report);
            }
        }

        report.pruned_widgets = self.settings.retain_widgets(&self.host.installed_widgets())?;
        if report.pruned_widgets > 0 {
            debug!(
                "[cycle {}] removed {} stale widget configurations",
                id, report.pruned_widgets
            );
        }

        let tracked = self.settings.tracked_symbols()?;
        report.evicted = self.cache.evict(tracked.as_slice());

        if tracked.is_empty() {
            debug!("[cycle {}] no tracked symbols", id);
            report.outcome = CycleOutcome::NoTrackedSymbols;
            self.enter(id, CyclePhase::Idle);
            return Ok(report);
        }

        let credential = self.settings.credential()?;
        debug!(
            "[cycle {}] tracking {:?}, api key {}",
            id,
            tracked.as_slice(),
            if credential.trim().is_empty() { "empty" } else { "set" }
        );

        self.enter(id, CyclePhase::Fetching);
        if credential.trim().is_empty() {
            report.outcome = CycleOutcome::Synthetic;
            let quotes = synthesize_all(&tracked, now);
            report.succeeded = quotes.iter().map(|q| q.symbol.clone()).collect();
            self.cache.put_many(quotes);
        } else {
            report.outcome = CycleOutcome::Live;
            for symbol in &tracked {
                match self.fetcher.fetch(symbol, credential.trim()).await {
                    Ok(quote) => {
                        debug!("[cycle {}] updated {}: {}", id, symbol, quote.price);
                        self.cache.put(symbol, quote);
                        report.succeeded.push(symbol.clone());
                    }
                    Err(e) => {
                        warn!(
                            "[cycle {}] fetch failed for {}, keeping cached data: {}",
                            id, symbol, e
                        );
                        report.failed.push((symbol.clone(), e.to_string()));
                    }
                }
            }
        }

        self.enter(id, CyclePhase::Reconciling);
        let any_success = report.any_success();
        let should_propagate =
            any_success || tracked.iter().all(|symbol| self.cache.has_real_data(symbol));

        if should_propagate {
            self.enter(id, CyclePhase::Propagating);
            self.host.notify_widgets_to_refresh();
            report.propagated = true;

            let pushed_at = self.clock.now();
            self.record(id, "widget push", self.status.record_widget_push(pushed_at));
            if any_success {
                self.record(id, "success", self.status.record_success(pushed_at));
            }
        } else {
            warn!(
                "[cycle {}] no widget refresh: all fetches failed and some symbols have no cached data",
                id
            );
        }

        self.enter(id, CyclePhase::Idle);
        Ok(report)
    }

    fn enter(&self, id: Uuid, phase: CyclePhase) {
        debug!("[cycle {}] -> {}", id, phase);
    }

    fn record(&self, id: Uuid, what: &str, result: Result<()>) {
        if let Err(e) = result {
            warn!("[cycle {}] failed to record {}: {}", id, what, e);
        }
    }
}

/// Synthetic quotes for every tracked symbol.
fn synthesize_all(tracked: &TrackedSymbols, now: DateTime<Utc>) -> Vec<Quote> {
    let mut rng = rand::thread_rng();
    tracked
        .iter()
        .map(|symbol| synthesize_quote(symbol, now, &mut rng))
        .collect()
}
