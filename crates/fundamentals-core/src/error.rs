//! Error types for fundamentals operations.
//!
//! This module defines [`FundamentalsError`] which covers configuration,
//! transport and payload-shape failures. A ticker that cannot be found is not
//! an error; see [`Lookup`](crate::Lookup).

use thiserror::Error;

/// Errors that can occur while fetching or normalizing fundamentals.
#[derive(Error, Debug)]
pub enum FundamentalsError {
    /// Missing or invalid configuration (credentials, target market, window).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status or an error document.
    #[error("Provider {provider} unavailable{}: {message}", status_suffix(.status))]
    ProviderUnavailable {
        /// The provider that failed.
        provider: String,
        /// HTTP status code, when the failure came from the transport.
        status: Option<u16>,
        /// Provider-supplied detail.
        message: String,
    },

    /// The provider refused the request because of its call quota.
    #[error("Rate limited by {provider}: {message}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Provider-supplied detail.
        message: String,
    },

    /// Connection-level failure before any response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// A field every record must carry is absent.
    #[error("Missing required field: {field}")]
    MissingRequiredField {
        /// Source name of the absent field.
        field: String,
    },

    /// The payload had the right shape but a value could not be interpreted.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The company query could not be used.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl FundamentalsError {
    /// Returns true for failures of the remote service itself.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::RateLimited { .. } | Self::Network(_)
        )
    }

    /// Returns true for failures caused by the content of a response.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::MalformedPayload(_)
        )
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias using [`FundamentalsError`].
pub type Result<T> = std::result::Result<T, FundamentalsError>;
