//! Market data models
//!
//! This module contains the core data types for quote lookups:
//! - `quote` - The cached/fetched price snapshot (Quote)
//! - `symbol` - Ticker canonicalization helpers

mod quote;
mod symbol;

pub use quote::{Quote, PLACEHOLDER_CHANGE, PLACEHOLDER_PERCENT_CHANGE, PLACEHOLDER_PRICE};
pub use symbol::normalize_symbol;
