//! Stock Widget Core - quote cache, market calendar and update orchestration.
//!
//! This crate owns the state behind the home-screen quote widgets. It is
//! host-agnostic: settings storage, the widget surfaces and the clock are
//! reached through traits that the hosting process implements.

pub mod cache;
pub mod calendar;
pub mod constants;
pub mod errors;
pub mod settings;
pub mod status;
pub mod updater;
pub mod utils;
pub mod widgets;

pub use cache::{CacheSnapshot, CacheStorage, FileCacheStorage, MemoryCacheStorage, QuoteCache};
pub use calendar::MarketCalendar;
pub use settings::{Settings, SettingsStore, TrackedSymbols};
pub use status::{StatusLog, UpdateStatus};
pub use updater::{CycleOutcome, CycleReport, QuoteUpdateService, RetryableError, UpdateScheduler};
pub use utils::{Clock, SystemClock};
pub use widgets::{WidgetConfig, WidgetHost, WidgetKey, WidgetSize};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
