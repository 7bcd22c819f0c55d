//! Quote fetcher trait definition.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::Quote;

/// Trait for remote quote sources.
///
/// Implement this trait to add support for a new quote provider. The update
/// orchestrator calls [`fetch`](Self::fetch) once per tracked symbol per cycle.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwidget_market_data::{FetchError, Quote, QuoteFetcher};
///
/// struct MyFetcher;
///
/// #[async_trait]
/// impl QuoteFetcher for MyFetcher {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn fetch(&self, symbol: &str, credential: &str) -> Result<Quote, FetchError> {
///         // ... one request, no retries
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for `symbol`.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Canonical (uppercase) ticker
    /// * `credential` - Opaque API key passed to the provider as-is
    ///
    /// # Returns
    ///
    /// A quote with `last_updated` set to the time of the fetch, or a
    /// [`FetchError`] describing why the lookup failed.
    async fn fetch(&self, symbol: &str, credential: &str) -> Result<Quote, FetchError>;
}
