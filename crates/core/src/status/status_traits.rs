use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::UpdateStatus;
use crate::errors::{Error, Result};

/// Diagnostics record written by the update cycle.
pub trait StatusLog: Send + Sync {
    fn status(&self) -> Result<UpdateStatus>;

    fn record_attempt(&self, at: DateTime<Utc>) -> Result<()>;

    fn record_success(&self, at: DateTime<Utc>) -> Result<()>;

    fn record_widget_push(&self, at: DateTime<Utc>) -> Result<()>;
}

/// Status log held in process memory.
#[derive(Default)]
pub struct InMemoryStatusLog {
    status: Mutex<UpdateStatus>,
}

impl InMemoryStatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, f: impl FnOnce(&mut UpdateStatus) -> bool) -> Result<()> {
        let mut status = self
            .status
            .lock()
            .map_err(|e| Error::Unexpected(format!("status lock poisoned: {}", e)))?;
        f(&mut status);
        Ok(())
    }
}

impl StatusLog for InMemoryStatusLog {
    fn status(&self) -> Result<UpdateStatus> {
        self.status
            .lock()
            .map(|s| *s)
            .map_err(|e| Error::Unexpected(format!("status lock poisoned: {}", e)))
    }

    fn record_attempt(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|s| s.record_attempt(at))
    }

    fn record_success(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|s| s.record_success(at))
    }

    fn record_widget_push(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|s| s.record_widget_push(at))
    }
}
