//! Quote source abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteFetcher` trait that remote quote sources implement
//! - The Finnhub implementation used when an API key is configured
//! - The synthetic generator used when no API key is configured
//!
//! A fetcher performs exactly one attempt per call. Retries, if any, are
//! the caller's responsibility.

mod traits;

pub mod finnhub;
pub mod synthetic;

pub use traits::QuoteFetcher;
