//! Update status log: timestamps of the last attempt, success and widget push.

mod status_model;
mod status_traits;

pub use status_model::UpdateStatus;
pub use status_traits::{InMemoryStatusLog, StatusLog};
