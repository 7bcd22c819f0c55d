//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`FetchError`]: The error enum for a single quote lookup
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during a single quote lookup.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a usable HTTP response, or the response
    /// was not a 2xx. Connect and read timeouts land here as well.
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status code, when the server answered
        status: Option<u16>,
        /// Human readable cause
        message: String,
    },

    /// The provider answered with an error payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The payload was missing numeric fields, had non-numeric values,
    /// or reported a non-positive price.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl FetchError {
    /// Build a transport error without a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Build a transport error for a non-2xx HTTP status.
    pub fn http_status(status: u16) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("HTTP {}", status),
        }
    }

    /// Returns true for network or HTTP-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// A symbol gets exactly one attempt per cycle, so every failure is
    /// deferred to the next cycle. Invalid credentials are the exception:
    /// a 401 will not fix itself until the user edits the API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockwidget_market_data::errors::{FetchError, RetryClass};
    ///
    /// let error = FetchError::http_status(503);
    /// assert_eq!(error.retry_class(), RetryClass::NextCycle);
    ///
    /// let error = FetchError::http_status(401);
    /// assert_eq!(error.retry_class(), RetryClass::NeedsUserAction);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Transport {
                status: Some(401), ..
            } => RetryClass::NeedsUserAction,
            Self::Transport { .. } | Self::Provider(_) | Self::InvalidData(_) => {
                RetryClass::NextCycle
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("Request timed out: {}", error)
        } else if error.is_connect() {
            format!("Connection failed: {}", error)
        } else {
            format!("Request failed: {}", error)
        };

        FetchError::Transport {
            status: error.status().map(|s| s.as_u16()),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_transport() {
        let error = FetchError::http_status(500);
        assert!(error.is_transport());
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_provider_error_has_no_status() {
        let error = FetchError::Provider("Symbol not supported".to_string());
        assert!(!error.is_transport());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_transient_errors_retry_next_cycle() {
        assert_eq!(
            FetchError::transport("connection reset").retry_class(),
            RetryClass::NextCycle
        );
        assert_eq!(
            FetchError::Provider("API limit reached".to_string()).retry_class(),
            RetryClass::NextCycle
        );
        assert_eq!(
            FetchError::InvalidData("price 0".to_string()).retry_class(),
            RetryClass::NextCycle
        );
    }

    #[test]
    fn test_unauthorized_needs_user_action() {
        assert_eq!(
            FetchError::http_status(401).retry_class(),
            RetryClass::NeedsUserAction
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::http_status(429).to_string(),
            "Transport error: HTTP 429"
        );
        assert_eq!(
            FetchError::transport("timed out").to_string(),
            "Transport error: timed out"
        );
        assert_eq!(
            FetchError::Provider("You don't have access".to_string()).to_string(),
            "Provider error: You don't have access"
        );
        assert_eq!(
            FetchError::InvalidData("missing field c".to_string()).to_string(),
            "Invalid data: missing field c"
        );
    }
}
