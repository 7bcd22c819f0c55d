use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::Error;

/// Steps of one update cycle, logged on each transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    CheckGate,
    Fetching,
    Reconciling,
    Propagating,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::CheckGate => "check_gate",
            CyclePhase::Fetching => "fetching",
            CyclePhase::Reconciling => "reconciling",
            CyclePhase::Propagating => "propagating",
        };
        f.write_str(name)
    }
}

/// How a completed cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleOutcome {
    /// Scheduled cycle outside market hours; only the attempt was recorded.
    MarketClosed,
    /// No widget references a symbol.
    NoTrackedSymbols,
    /// No API key configured; every symbol got a synthetic quote.
    Synthetic,
    /// Quotes were requested from the provider.
    Live,
}

/// Summary of a completed cycle.
///
/// Per-symbol failures land in `failed`; the cycle itself still counts as
/// completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub id: Uuid,
    pub forced: bool,
    pub outcome: CycleOutcome,
    pub succeeded: Vec<String>,
    /// Symbol and error message for each failed fetch.
    pub failed: Vec<(String, String)>,
    pub propagated: bool,
    /// Cache entries dropped because no widget tracks them anymore.
    pub evicted: usize,
    /// Widget configurations dropped because the widget was removed.
    pub pruned_widgets: usize,
}

impl CycleReport {
    pub(crate) fn new(id: Uuid, forced: bool) -> Self {
        Self {
            id,
            forced,
            outcome: CycleOutcome::MarketClosed,
            succeeded: Vec::new(),
            failed: Vec::new(),
            propagated: false,
            evicted: 0,
            pruned_widgets: 0,
        }
    }

    pub fn any_success(&self) -> bool {
        !self.succeeded.is_empty()
    }
}

/// A cycle aborted by an unexpected failure.
///
/// The scheduler answers this with a retry rather than treating it as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Update cycle {cycle_id} failed, retry requested: {message}")]
pub struct RetryableError {
    pub cycle_id: Uuid,
    pub message: String,
}

impl RetryableError {
    pub fn new(cycle_id: Uuid, cause: Error) -> Self {
        Self {
            cycle_id,
            message: cause.to_string(),
        }
    }
}
