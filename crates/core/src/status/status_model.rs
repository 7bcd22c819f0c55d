use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamps recorded by the update cycle. `None` means never.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_widget_push: Option<DateTime<Utc>>,
}

impl UpdateStatus {
    pub fn record_attempt(&mut self, at: DateTime<Utc>) -> bool {
        advance(&mut self.last_attempt, at)
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) -> bool {
        advance(&mut self.last_success, at)
    }

    pub fn record_widget_push(&mut self, at: DateTime<Utc>) -> bool {
        advance(&mut self.last_widget_push, at)
    }
}

/// Moves `slot` forward to `at`. Older timestamps are ignored.
fn advance(slot: &mut Option<DateTime<Utc>>, at: DateTime<Utc>) -> bool {
    match slot {
        Some(current) if *current > at => false,
        _ => {
            *slot = Some(at);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamps_never_move_backwards() {
        let now = Utc::now();
        let mut status = UpdateStatus::default();

        assert!(status.record_attempt(now));
        assert!(!status.record_attempt(now - Duration::minutes(1)));
        assert_eq!(status.last_attempt, Some(now));

        assert!(status.record_attempt(now + Duration::minutes(1)));
        assert_eq!(status.last_attempt, Some(now + Duration::minutes(1)));
        assert_eq!(status.last_success, None);
        assert_eq!(status.last_widget_push, None);
    }
}
