use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::constants::{MARKET_CLOSE_MINUTES, MARKET_OPEN_MINUTES};
use crate::utils::{minutes_of_day, DEFAULT_EXCHANGE_TZ};

/// Returns true when the regular session is open at `now` in `tz`.
///
/// Saturday and Sunday are always closed. On weekdays the window runs from
/// 9:30 through 16:00 local time, with the close pushed out by
/// `buffer_minutes`. Both ends are inclusive at minute resolution.
///
/// Exchange holidays are not modeled.
pub fn is_open(now: DateTime<Utc>, tz: Tz, buffer_minutes: u32) -> bool {
    let local = now.with_timezone(&tz);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    let minutes = minutes_of_day(now, tz);
    (MARKET_OPEN_MINUTES..=MARKET_CLOSE_MINUTES.saturating_add(buffer_minutes)).contains(&minutes)
}

/// Close-side buffer for a refresh interval, so a cycle starting just before
/// the close still runs.
pub fn buffer_for_interval(refresh_interval_minutes: u32) -> u32 {
    refresh_interval_minutes.saturating_add(1)
}

/// Exchange calendar bound to one timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketCalendar {
    tz: Tz,
}

impl MarketCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Open check with the buffer derived from `refresh_interval_minutes`.
    pub fn is_open(&self, now: DateTime<Utc>, refresh_interval_minutes: u32) -> bool {
        is_open(now, self.tz, buffer_for_interval(refresh_interval_minutes))
    }
}

impl Default for MarketCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_EXCHANGE_TZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const NY: Tz = DEFAULT_EXCHANGE_TZ;

    fn ny(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NY.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_open_boundary_inclusive() {
        // Wednesday
        assert!(is_open(ny(2024, 1, 10, 9, 30), NY, 16));
        assert!(!is_open(ny(2024, 1, 10, 9, 29), NY, 16));
    }

    #[test]
    fn test_buffered_close_boundary() {
        // 16:00 + 16 minutes buffer = 16:16
        assert!(is_open(ny(2024, 1, 10, 16, 16), NY, 16));
        assert!(!is_open(ny(2024, 1, 10, 16, 17), NY, 16));
    }

    #[test]
    fn test_zero_buffer_closes_at_four() {
        assert!(is_open(ny(2024, 1, 10, 16, 0), NY, 0));
        assert!(!is_open(ny(2024, 1, 10, 16, 1), NY, 0));
    }

    #[test]
    fn test_weekend_always_closed() {
        // Saturday and Sunday at midday
        assert!(!is_open(ny(2024, 1, 13, 12, 0), NY, 16));
        assert!(!is_open(ny(2024, 1, 14, 12, 0), NY, 16));
    }

    #[test]
    fn test_weekday_taken_from_exchange_zone() {
        // Saturday 01:00 UTC is still Friday 20:00 in New York, after close
        let instant = Utc.with_ymd_and_hms(2024, 1, 13, 1, 0, 0).unwrap();
        assert!(!is_open(instant, NY, 16));

        // Monday 00:30 UTC is still Sunday evening in New York
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap();
        assert!(!is_open(instant, NY, u32::MAX));
    }

    #[test]
    fn test_daylight_saving_shift() {
        // 13:45 UTC is 9:45 EDT in July but 8:45 EST in January
        let summer = Utc.with_ymd_and_hms(2024, 7, 10, 13, 45, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 10, 13, 45, 0).unwrap();
        assert!(is_open(summer, NY, 16));
        assert!(!is_open(winter, NY, 16));
    }

    #[test]
    fn test_calendar_uses_interval_buffer() {
        let calendar = MarketCalendar::default();
        assert_eq!(calendar.timezone(), NY);
        // interval 30 -> buffer 31 -> open through 16:31
        assert!(calendar.is_open(ny(2024, 1, 10, 16, 31), 30));
        assert!(!calendar.is_open(ny(2024, 1, 10, 16, 32), 30));
    }

    #[test]
    fn test_buffer_for_interval() {
        assert_eq!(buffer_for_interval(15), 16);
        assert_eq!(buffer_for_interval(u32::MAX), u32::MAX);
    }
}
