//! Update orchestration: the periodic fetch, reconcile and propagate cycle.

mod scheduler;
mod update_model;
mod update_service;


pub use scheduler::UpdateScheduler;
pub use update_model::{CycleOutcome, CyclePhase, CycleReport, RetryableError};
pub use update_service::QuoteUpdateService;
