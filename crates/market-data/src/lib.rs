//! Stock Widget Market Data Crate
//!
//! This crate provides single-symbol quote lookups for the stock widget
//! update subsystem.
//!
//! # Overview
//!
//! The market data crate supports:
//! - One remote lookup per symbol against the Finnhub `/quote` endpoint
//! - A synthetic quote generator used when no API key is configured
//! - A typed error taxonomy the update orchestrator can reason about
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! | Update Orchestr. | --> |   QuoteFetcher   |  (one attempt per call)
//! +------------------+     +------------------+
//!          |                        |
//!          | (no credential)        v
//!          v               +------------------+
//! +------------------+     |  FinnhubFetcher  |
//! | synthesize_quote |     +------------------+
//! +------------------+              |
//!          \                        v
//!           \------------> +------------------+
//!                          |      Quote       |
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Price snapshot for a symbol (`last_updated == None` marks placeholder data)
//! - [`FetchError`] - Transport, provider and invalid-data failures
//! - [`QuoteFetcher`] - Trait implemented by remote quote sources

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{FetchError, RetryClass};
pub use models::{normalize_symbol, Quote};
pub use provider::finnhub::FinnhubFetcher;
pub use provider::synthetic::{base_price_for, synthesize_quote};
pub use provider::QuoteFetcher;
