//! Configuration storage boundary.

use crate::errors::Result;
use crate::settings::TrackedSymbols;
use crate::widgets::{WidgetConfig, WidgetKey};

/// Access to user settings and per-widget configuration.
pub trait SettingsStore: Send + Sync {
    /// Provider API key, possibly empty.
    fn credential(&self) -> Result<String>;

    /// Refresh interval in minutes, never below the platform minimum.
    fn refresh_interval_minutes(&self) -> Result<u32>;

    fn widgets(&self) -> Result<Vec<WidgetConfig>>;

    fn upsert_widget(&self, config: WidgetConfig) -> Result<()>;

    /// Returns true if a widget was removed.
    fn remove_widget(&self, key: WidgetKey) -> Result<bool>;

    /// Removes configuration for widgets not in `installed`.
    /// Returns the number of removed widget configurations.
    fn retain_widgets(&self, installed: &[WidgetKey]) -> Result<usize>;

    fn set_credential(&self, credential: &str) -> Result<()>;

    /// Stores the interval after clamping and returns the stored value.
    fn set_refresh_interval_minutes(&self, minutes: u32) -> Result<u32>;

    /// Symbols referenced by configured widgets, recomputed on every call.
    fn tracked_symbols(&self) -> Result<TrackedSymbols> {
        Ok(TrackedSymbols::from_widgets(&self.widgets()?))
    }
}
