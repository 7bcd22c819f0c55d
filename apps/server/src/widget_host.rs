//! Widget host that renders every configured widget to text.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use stockwidget_core::cache::QuoteCache;
use stockwidget_core::settings::SettingsStore;
use stockwidget_core::widgets::{
    click_target, render_quote, ClickTarget, TextSurface, WidgetConfig, WidgetHost, WidgetKey,
    WidgetSize, WidgetTheme,
};
use tracing::{debug, warn};

/// Last rendered state of one widget.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWidget {
    pub id: u32,
    pub size: WidgetSize,
    pub theme: WidgetTheme,
    pub text: String,
    pub surface: TextSurface,
    pub click: ClickTarget,
    pub rendered_at: DateTime<Utc>,
}

/// Treats every widget in the preferences as installed and keeps the text
/// each one would currently display.
pub struct TextWidgetHost {
    settings: Arc<dyn SettingsStore>,
    cache: Arc<QuoteCache>,
    rendered: RwLock<BTreeMap<WidgetKey, RenderedWidget>>,
}

impl TextWidgetHost {
    pub fn new(settings: Arc<dyn SettingsStore>, cache: Arc<QuoteCache>) -> Self {
        Self {
            settings,
            cache,
            rendered: RwLock::new(BTreeMap::new()),
        }
    }

    /// Renders one widget from the cache, as after its configuration changed.
    pub fn render_widget(&self, config: &WidgetConfig) -> RenderedWidget {
        let quote = self.cache.get(&config.canonical_symbol());
        let mut surface = TextSurface::new();
        render_quote(&quote, config.size, &mut surface);

        let widget = RenderedWidget {
            id: config.id,
            size: config.size,
            theme: config.theme,
            text: surface.to_string(),
            surface,
            click: click_target(config),
            rendered_at: Utc::now(),
        };
        self.lock().insert(config.key(), widget.clone());
        widget
    }

    /// Drops the rendered state of a removed widget.
    pub fn forget(&self, key: WidgetKey) {
        self.lock().remove(&key);
    }

    pub fn rendered(&self) -> Vec<RenderedWidget> {
        self.rendered
            .read()
            .map(|r| r.values().cloned().collect())
            .unwrap_or_else(|poisoned| poisoned.into_inner().values().cloned().collect())
    }

    fn lock(&self) -> RwLockWriteGuard<'_, BTreeMap<WidgetKey, RenderedWidget>> {
        self.rendered.write().unwrap_or_else(|poisoned| {
            warn!("Widget render lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl WidgetHost for TextWidgetHost {
    fn installed_widgets(&self) -> Vec<WidgetKey> {
        match self.settings.widgets() {
            Ok(widgets) => widgets.iter().map(WidgetConfig::key).collect(),
            Err(e) => {
                warn!("Could not list widgets: {}", e);
                self.rendered.read().map(|r| r.keys().copied().collect()).unwrap_or_default()
            }
        }
    }

    fn notify_widgets_to_refresh(&self) {
        let widgets = match self.settings.widgets() {
            Ok(widgets) => widgets,
            Err(e) => {
                warn!("Skipping widget refresh: {}", e);
                return;
            }
        };

        for config in &widgets {
            self.render_widget(config);
        }
        self.lock()
            .retain(|key, _| widgets.iter().any(|w| w.key() == *key));
        debug!("Refreshed {} widgets", widgets.len());
    }
}
