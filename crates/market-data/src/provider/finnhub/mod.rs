//! Finnhub quote fetcher.
//!
//! Looks up the latest price for one symbol through the `/quote` endpoint.
//! The API key travels in the `X-Finnhub-Token` header.
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api/quote

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::QuoteFetcher;

/// Default API root. Overridable for self-hosted proxies and tests.
pub const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Connect phase timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read phase timeout.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// Error message, present when the provider rejects the request
    error: Option<String>,
    // Note: h, l, o, pc and t exist but the widget does not show them
}

// ============================================================================
// FinnhubFetcher
// ============================================================================

/// Finnhub quote fetcher.
///
/// Holds a pooled HTTP client with bounded connect and read phases.
/// The credential is supplied per call, so one fetcher survives API key edits.
pub struct FinnhubFetcher {
    client: Client,
    base_url: String,
}

impl FinnhubFetcher {
    /// Create a fetcher against the public Finnhub API.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Create a fetcher against a custom API root (no trailing slash needed).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make the GET request and return the body of a 2xx response.
    async fn request_quote(&self, symbol: &str, credential: &str) -> Result<String, FetchError> {
        let url = format!("{}/quote", self.base_url);

        debug!("Finnhub request: /quote for {}", symbol);

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", credential)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!("Finnhub rejected the configured API key");
            }
            return Err(FetchError::http_status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

impl Default for FinnhubFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteFetcher for FinnhubFetcher {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(&self, symbol: &str, credential: &str) -> Result<Quote, FetchError> {
        let body = self.request_quote(symbol, credential).await?;
        parse_quote_response(symbol, &body, Utc::now())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Translate a `/quote` response body into a quote fetched at `now`.
fn parse_quote_response(symbol: &str, body: &str, now: DateTime<Utc>) -> Result<Quote, FetchError> {
    let response: QuoteResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::InvalidData(format!("Failed to parse quote response: {}", e))
    })?;

    if let Some(message) = response.error {
        return Err(FetchError::Provider(message));
    }

    let price = required_decimal(response.c, "c")?;
    let change = required_decimal(response.d, "d")?;
    let percent_change = required_decimal(response.dp, "dp")?;

    if price <= Decimal::ZERO {
        return Err(FetchError::InvalidData(format!(
            "Invalid price data for {}: {}",
            symbol, price
        )));
    }

    Ok(Quote::new(symbol, price, change, percent_change, now))
}

fn required_decimal(value: Option<f64>, field: &str) -> Result<Decimal, FetchError> {
    let raw = value.ok_or_else(|| FetchError::InvalidData(format!("Missing field '{}'", field)))?;
    Decimal::try_from(raw)
        .map_err(|_| FetchError::InvalidData(format!("Non-numeric value in '{}': {}", field, raw)))
}

// ============================================================================
// Tests
// ============================================================================
