//! Error types for the gateway REST client.

use crate::types::{RentalId, SmsStatus};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::GatewayClient`].
#[derive(Debug, Error)]
pub enum GatewayClientError {
    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Base URL is not a valid URL.
    #[error("Invalid gateway URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// Base URL cannot carry path segments.
    #[error("Gateway URL cannot be a base URL: {url}")]
    BaseUrlNotABase { url: String },

    /// Failed to send HTTP request.
    #[error("Gateway request failed: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read gateway response: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// The gateway answered with an error status.
    #[error("Gateway returned HTTP {status} ({error}): {detail}")]
    Api {
        status: u16,
        error: String,
        detail: String,
    },

    /// 2xx answer whose body could not be decoded.
    #[error("Unexpected gateway response (HTTP {status}): {raw}")]
    UnexpectedResponse {
        status: u16,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// No code arrived in time.
    #[error(
        "Timeout waiting for SMS code after {:.1}s (polled {} times); Rental id: {rental_id}",
        elapsed.as_secs_f64(),
        poll_count
    )]
    Timeout {
        /// Configured timeout duration.
        timeout: Duration,
        /// Actual elapsed time.
        elapsed: Duration,
        /// Number of poll attempts made.
        poll_count: u32,
        /// The rental that timed out.
        rental_id: RentalId,
    },

    /// The rental left the waiting state without a code.
    #[error("Rental {rental_id} ended with status '{status}' before a code arrived")]
    UnexpectedStatus {
        /// Status the gateway reported.
        status: SmsStatus,
        /// The rental that ended.
        rental_id: RentalId,
    },

    /// Cancellation was requested.
    #[error(
        "Wait cancelled after {:.1}s (polled {} times); Rental id: {rental_id}",
        elapsed.as_secs_f64(),
        poll_count
    )]
    Cancelled {
        /// Elapsed time before cancellation.
        elapsed: Duration,
        /// Number of poll attempts made.
        poll_count: u32,
        /// The rental whose wait was cancelled.
        rental_id: RentalId,
    },
}

impl GatewayClientError {
    /// Returns true when retrying the same call may succeed: transport
    /// failures and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayClientError::HttpRequest(_) | GatewayClientError::ReadResponse(_) => true,
            GatewayClientError::Api { status, .. } => *status >= 500,
            GatewayClientError::BuildHttpClient(_)
            | GatewayClientError::InvalidBaseUrl(_)
            | GatewayClientError::BaseUrlNotABase { .. }
            | GatewayClientError::UnexpectedResponse { .. }
            | GatewayClientError::Timeout { .. }
            | GatewayClientError::UnexpectedStatus { .. }
            | GatewayClientError::Cancelled { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server_error = GatewayClientError::Api {
            status: 500,
            error: "internal_error".to_string(),
            detail: "NO_NUMBERS".to_string(),
        };
        let bad_request = GatewayClientError::Api {
            status: 400,
            error: "invalid_request".to_string(),
            detail: "Unknown provider: x".to_string(),
        };

        assert!(server_error.is_transient());
        assert!(!bad_request.is_transient());
        assert_eq!(
            bad_request.to_string(),
            "Gateway returned HTTP 400 (invalid_request): Unknown provider: x"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = GatewayClientError::Timeout {
            timeout: Duration::from_secs(2),
            elapsed: Duration::from_millis(2100),
            poll_count: 4,
            rental_id: RentalId::from("12345"),
        };
        assert_eq!(
            err.to_string(),
            "Timeout waiting for SMS code after 2.1s (polled 4 times); Rental id: 12345"
        );
        assert!(!err.is_transient());
    }
}
