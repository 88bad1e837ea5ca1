//! Error classification shared by every provider adapter.

use std::fmt::{self, Display, Formatter};

/// Coarse failure category of a provider operation.
///
/// The gateway only looks at this category when deciding how a failure is
/// reported to the caller; the concrete provider error keeps the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The provider credential is not configured.
    ConfigMissing,
    /// The provider answered with an explicit failure (sentinel text,
    /// non-2xx status, or a body that is not a success payload).
    UpstreamRejected,
    /// The provider could not be reached (connect error, timeout, broken body).
    UpstreamUnreachable,
    /// Anything else: request construction, client setup.
    Internal,
}

impl ErrorKind {
    /// Returns the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMissing => "config_missing",
            Self::UpstreamRejected => "upstream_rejected",
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for errors that can be sorted into an [`ErrorKind`].
///
/// # Examples
///
/// ```rust
/// use sms_gateway::{ClassifiedError, ErrorKind};
///
/// enum MyError {
///     NoKey,
///     Timeout,
///     Refused(String),
/// }
///
/// impl ClassifiedError for MyError {
///     fn kind(&self) -> ErrorKind {
///         match self {
///             MyError::NoKey => ErrorKind::ConfigMissing,
///             MyError::Timeout => ErrorKind::UpstreamUnreachable,
///             MyError::Refused(_) => ErrorKind::UpstreamRejected,
///         }
///     }
/// }
///
/// assert!(MyError::NoKey.is_config_missing());
/// assert!(!MyError::Timeout.is_config_missing());
/// ```
pub trait ClassifiedError {
    /// Returns the failure category.
    fn kind(&self) -> ErrorKind;

    /// Returns true when the failure is caused by a missing credential.
    fn is_config_missing(&self) -> bool {
        self.kind() == ErrorKind::ConfigMissing
    }
}
