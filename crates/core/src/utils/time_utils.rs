use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Default exchange timezone.
/// Regular session hours are defined in this zone's wall-clock time.
pub const DEFAULT_EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

/// Source of the current instant.
/// Abstracted for testing purposes.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an IANA timezone name, e.g. `America/New_York`.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Minutes elapsed since local midnight for `instant` viewed in `tz`.
pub fn minutes_of_day(instant: DateTime<Utc>, tz: Tz) -> u32 {
    let local = instant.with_timezone(&tz).time();
    local.hour() * 60 + local.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/New_York"), Some(DEFAULT_EXCHANGE_TZ));
        assert_eq!(parse_timezone(" Europe/London "), Some(chrono_tz::Europe::London));
        assert_eq!(parse_timezone("Mars/Olympus"), None);
    }

    #[test]
    fn test_minutes_of_day_uses_local_wall_clock() {
        // 14:30 UTC in January is 09:30 in New York (EST)
        let instant = Utc.with_ymd_and_hms(2024, 1, 10, 14, 30, 0).unwrap();
        assert_eq!(minutes_of_day(instant, DEFAULT_EXCHANGE_TZ), 570);

        // 13:30 UTC in July is 09:30 in New York (EDT)
        let instant = Utc.with_ymd_and_hms(2024, 7, 10, 13, 30, 59).unwrap();
        assert_eq!(minutes_of_day(instant, DEFAULT_EXCHANGE_TZ), 570);
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
