//! Gateway-level error types.

use crate::errors::{ClassifiedError, ErrorKind};
use crate::providers::ProviderError;
use crate::types::UnknownProviderError;
use thiserror::Error;

/// Caller-facing errors of the gateway.
///
/// Adapter failures are folded into two outcomes: the caller asked for
/// something that cannot be served (unknown provider, missing credential,
/// malformed input), or the provider side failed. The message is the
/// adapter's diagnostic, upstream raw text included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request cannot be served as given.
    #[error("{0}")]
    InvalidRequest(String),

    /// The provider rejected the call, could not be reached, or the gateway
    /// failed internally.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Machine-readable name of the error category.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Internal(_) => "internal_error",
        }
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        match self {
            GatewayError::InvalidRequest(detail) | GatewayError::Internal(detail) => detail,
        }
    }

    /// Returns true for [`GatewayError::InvalidRequest`].
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, GatewayError::InvalidRequest(_))
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        match err.kind() {
            ErrorKind::ConfigMissing => GatewayError::InvalidRequest(err.to_string()),
            ErrorKind::UpstreamRejected | ErrorKind::UpstreamUnreachable | ErrorKind::Internal => {
                GatewayError::Internal(err.to_string())
            }
        }
    }
}

impl From<UnknownProviderError> for GatewayError {
    fn from(err: UnknownProviderError) -> Self {
        GatewayError::InvalidRequest(err.to_string())
    }
}
