/// Minimum refresh interval accepted by the platform's periodic scheduler.
pub const MIN_REFRESH_INTERVAL_MINUTES: u32 = 15;

/// Refresh interval used when the user never picked one.
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u32 = 15;

/// Regular session open, minutes after local midnight (9:30).
pub const MARKET_OPEN_MINUTES: u32 = 9 * 60 + 30;

/// Regular session close, minutes after local midnight (16:00).
pub const MARKET_CLOSE_MINUTES: u32 = 16 * 60;

/// Symbol shown by a freshly placed widget before the user picks one.
pub const DEFAULT_WIDGET_SYMBOL: &str = "SPY";

/// File name of the persisted quote cache inside the data directory.
pub const QUOTE_CACHE_FILE: &str = "quote_cache.json";
