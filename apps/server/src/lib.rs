pub mod api;
pub mod config;
pub mod error;
pub mod prefs;
pub mod widget_host;
mod main_lib;
mod scheduler;

pub use main_lib::{build_state, init_tracing, AppState};
