//! Market calendar: decides whether a scheduled cycle may run.

mod market_hours;

pub use market_hours::{buffer_for_interval, is_open, MarketCalendar};
