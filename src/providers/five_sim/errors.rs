//! Error types for the 5sim adapter.

use crate::errors::{ClassifiedError, ErrorKind};
use thiserror::Error;

/// Main error type for 5sim operations.
#[derive(Debug, Error)]
pub enum FiveSimError {
    /// No API key configured.
    #[error("5SIM API key not configured")]
    MissingApiKey,

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Base URL is not a valid URL.
    #[error("Invalid 5SIM endpoint: {0}")]
    InvalidEndpoint(#[source] url::ParseError),

    /// Base URL cannot carry path segments.
    #[error("5SIM endpoint cannot be a base URL: {endpoint}")]
    EndpointNotABase { endpoint: String },

    /// Failed to send HTTP request.
    #[error("5SIM request failed: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read 5SIM response: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// Non-2xx HTTP status; `message` is the raw body.
    #[error("5SIM returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// 2xx answer whose body is not the expected JSON (5sim reports some
    /// refusals, such as `no free phones`, as plain text).
    #[error("Unexpected 5SIM response: {raw}")]
    UnexpectedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Order answer without a field the caller needs.
    #[error("5SIM order {id} has no {field}")]
    IncompleteOrder { id: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, FiveSimError>;

impl ClassifiedError for FiveSimError {
    fn kind(&self) -> ErrorKind {
        match self {
            FiveSimError::MissingApiKey => ErrorKind::ConfigMissing,
            FiveSimError::HttpRequest(_) | FiveSimError::ReadResponse(_) => {
                ErrorKind::UpstreamUnreachable
            }
            FiveSimError::Rejected { .. }
            | FiveSimError::UnexpectedResponse { .. }
            | FiveSimError::IncompleteOrder { .. } => ErrorKind::UpstreamRejected,
            FiveSimError::BuildHttpClient(_)
            | FiveSimError::InvalidEndpoint(_)
            | FiveSimError::EndpointNotABase { .. } => ErrorKind::Internal,
        }
    }
}
