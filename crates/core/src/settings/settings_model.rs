use serde::{Deserialize, Serialize};
use stockwidget_market_data::normalize_symbol;

use crate::constants::{DEFAULT_REFRESH_INTERVAL_MINUTES, MIN_REFRESH_INTERVAL_MINUTES};
use crate::widgets::{WidgetConfig, WidgetKey};

/// Clamps a requested refresh interval to the platform minimum.
pub fn clamp_refresh_interval(minutes: u32) -> u32 {
    minutes.max(MIN_REFRESH_INTERVAL_MINUTES)
}

/// User settings shared by the configuration screens and the updater.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Provider API key. Empty selects synthetic quotes.
    #[serde(default)]
    pub credential: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u32,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

fn default_refresh_interval() -> u32 {
    DEFAULT_REFRESH_INTERVAL_MINUTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: String::new(),
            refresh_interval_minutes: DEFAULT_REFRESH_INTERVAL_MINUTES,
            widgets: Vec::new(),
        }
    }
}

impl Settings {
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Inserts `config`, replacing any widget with the same key.
    pub fn upsert_widget(&mut self, config: WidgetConfig) {
        match self.widgets.iter_mut().find(|w| w.key() == config.key()) {
            Some(existing) => *existing = config,
            None => self.widgets.push(config),
        }
    }

    pub fn remove_widget(&mut self, key: WidgetKey) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.key() != key);
        self.widgets.len() != before
    }

    /// Drops configuration of widgets that are no longer installed.
    pub fn retain_widgets(&mut self, installed: &[WidgetKey]) -> usize {
        let before = self.widgets.len();
        self.widgets.retain(|w| installed.contains(&w.key()));
        before - self.widgets.len()
    }
}

/// Symbols referenced by widget configurations.
///
/// Keeps first-seen order and holds each canonical symbol once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrackedSymbols(Vec<String>);

impl TrackedSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_widgets(widgets: &[WidgetConfig]) -> Self {
        widgets.iter().map(WidgetConfig::canonical_symbol).collect()
    }

    /// Adds `symbol` after canonicalizing. Returns false for blanks and duplicates.
    pub fn insert(&mut self, symbol: &str) -> bool {
        match normalize_symbol(symbol) {
            Some(symbol) if !self.0.contains(&symbol) => {
                self.0.push(symbol);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TrackedSymbols {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tracked = TrackedSymbols::new();
        for symbol in iter {
            tracked.insert(symbol.as_ref());
        }
        tracked
    }
}

impl<'a> IntoIterator for &'a TrackedSymbols {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
