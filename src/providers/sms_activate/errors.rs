//! Error types for the sms-activate adapter.

use crate::errors::{ClassifiedError, ErrorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Error sentinels returned by the sms-activate handler API.
#[derive(Debug, Clone, PartialEq)]
pub enum SmsActivateErrorCode {
    /// No numbers available for the requested country/service.
    NoNumbers,
    /// Account balance is too low.
    NoBalance,
    /// Internal SQL error on service side.
    ErrorSql,
    /// Activation with this id does not exist.
    NoActivation,
    /// Invalid API key.
    BadKey,
    /// Incorrect action.
    BadAction,
    /// Incorrect service code.
    BadService,
    /// Incorrect status.
    BadStatus,
    /// Invalid activation ID or ID is not a number.
    WrongActivationId,
    /// Not allowed to cancel within the first 2 minutes.
    EarlyCancelDenied,
    /// Account banned until specified datetime.
    Banned { until: String },
    /// Maximum price is less than allowed minimum.
    WrongMaxPrice { min: Option<f64> },

    /// Unknown error code from service.
    Unknown { raw: String },
}

impl SmsActivateErrorCode {
    /// Returns the API error code string representation.
    pub fn code_name(&self) -> &str {
        match self {
            Self::NoNumbers => "NO_NUMBERS",
            Self::NoBalance => "NO_BALANCE",
            Self::ErrorSql => "ERROR_SQL",
            Self::NoActivation => "NO_ACTIVATION",
            Self::BadKey => "BAD_KEY",
            Self::BadAction => "BAD_ACTION",
            Self::BadService => "BAD_SERVICE",
            Self::BadStatus => "BAD_STATUS",
            Self::WrongActivationId => "WRONG_ACTIVATION_ID",
            Self::EarlyCancelDenied => "EARLY_CANCEL_DENIED",
            Self::Banned { .. } => "BANNED",
            Self::WrongMaxPrice { .. } => "WRONG_MAX_PRICE",
            Self::Unknown { raw } => raw.as_str(),
        }
    }

    /// Returns human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::NoNumbers => "No numbers available".to_string(),
            Self::NoBalance => "Insufficient account balance".to_string(),
            Self::ErrorSql => "Internal SQL error on service side".to_string(),
            Self::NoActivation => "Activation does not exist".to_string(),
            Self::BadKey => "Invalid API key".to_string(),
            Self::BadAction => "Incorrect action".to_string(),
            Self::BadService => "Incorrect service code".to_string(),
            Self::BadStatus => "Incorrect status".to_string(),
            Self::WrongActivationId => "Invalid activation ID".to_string(),
            Self::EarlyCancelDenied => "Not allowed to cancel within first 2 minutes".to_string(),
            Self::Banned { until } => format!("Account banned until {}", until),
            Self::WrongMaxPrice { min } => match min {
                Some(v) => format!("Maximum price is less than allowed minimum: {}", v),
                None => "Maximum price is less than allowed minimum".to_string(),
            },
            Self::Unknown { raw } => format!("Unknown error: {}", raw),
        }
    }

    /// Parse error code from raw API response.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let s = raw.trim();

        let code = match s {
            "NO_NUMBERS" => Self::NoNumbers,
            "NO_BALANCE" => Self::NoBalance,
            "ERROR_SQL" => Self::ErrorSql,
            "NO_ACTIVATION" => Self::NoActivation,
            "BAD_KEY" => Self::BadKey,
            "BAD_ACTION" => Self::BadAction,
            "BAD_SERVICE" => Self::BadService,
            "BAD_STATUS" => Self::BadStatus,
            "WRONG_ACTIVATION_ID" => Self::WrongActivationId,
            "EARLY_CANCEL_DENIED" => Self::EarlyCancelDenied,
            _ => return Self::parse_parametrized_error(s),
        };

        Some(code)
    }

    /// Parse error codes with parameters (BANNED, WRONG_MAX_PRICE).
    fn parse_parametrized_error(s: &str) -> Option<Self> {
        // BANNED:'YYYY-m-d H-i-s'
        static RE_BANNED: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"^BANNED\s*:\s*['"]([^'"]+)['"]$"#).expect("valid BANNED regex")
        });
        if let Some(until) = RE_BANNED.captures(s).and_then(|cap| cap.get(1)) {
            return Some(Self::Banned {
                until: until.as_str().to_string(),
            });
        }

        // WRONG_MAX_PRICE:<num>
        static RE_WRONG_MAX_PRICE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"^WRONG_MAX_PRICE\s*:\s*([0-9]+(?:\.[0-9]+)?)$"#)
                .expect("valid WRONG_MAX_PRICE regex")
        });
        if let Some(cap) = RE_WRONG_MAX_PRICE.captures(s) {
            let min = cap.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
            return Some(Self::WrongMaxPrice { min });
        }

        if Self::looks_like_error_code(s) {
            return Some(Self::Unknown { raw: s.to_string() });
        }

        None
    }

    /// Check if string looks like an error code format.
    fn looks_like_error_code(s: &str) -> bool {
        if s.is_empty() || s.starts_with("ACCESS_") || s.starts_with("STATUS_") {
            return false;
        }

        const KNOWN_ERROR_PREFIXES: [&str; 7] = [
            "NO_", "ERROR_", "BAD_", "WRONG_", "EARLY_", "BANNED", "CHANNELS_",
        ];

        KNOWN_ERROR_PREFIXES
            .iter()
            .any(|prefix| s.starts_with(prefix))
    }
}

impl Display for SmsActivateErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code_name())
    }
}

/// Error sentinel returned by sms-activate, decoded.
#[derive(Debug, Clone, Error)]
#[error("{code} ({description}); raw response: {raw}")]
pub struct SmsActivateServiceError {
    /// Error code from the service.
    pub code: SmsActivateErrorCode,
    /// Human-readable description.
    pub description: String,
    /// Original raw response text.
    pub raw: String,
}

impl SmsActivateServiceError {
    /// Create new service error from code and raw response.
    pub fn new(code: SmsActivateErrorCode, raw: String) -> Self {
        let description = code.description();
        Self {
            code,
            description,
            raw,
        }
    }
}

/// Parse an sms-activate error sentinel from response text.
pub(crate) fn parse_sms_activate_error(raw: &str) -> Option<SmsActivateServiceError> {
    let code = SmsActivateErrorCode::from_raw(raw)?;
    let error = SmsActivateServiceError::new(code, raw.trim().to_string());

    #[cfg(feature = "tracing")]
    warn!(
        code = %error.code,
        description = %error.description,
        raw = %raw,
        "sms-activate returned error sentinel"
    );

    Some(error)
}

/// Main error type for sms-activate operations.
#[derive(Debug, Error)]
pub enum SmsActivateError {
    /// No API key configured.
    #[error("SMS-Activate API key not configured")]
    MissingApiKey,

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Endpoint is not a valid URL.
    #[error("Invalid SMS-Activate endpoint: {0}")]
    InvalidEndpoint(#[source] url::ParseError),

    /// Error building the request URL.
    #[error("Error building SMS-Activate request URL: {0}")]
    BuildRequestUrl(#[source] serde_urlencoded::ser::Error),

    /// Failed to send HTTP request.
    #[error("SMS-Activate request failed: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read SMS-Activate response: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// Known error sentinel.
    #[error("SMS-Activate error: {0}")]
    Service(#[source] SmsActivateServiceError),

    /// Non-2xx HTTP status.
    #[error("SMS-Activate returned HTTP {status}: {raw}")]
    HttpStatus { status: u16, raw: String },

    /// Response text that is neither the expected sentinel nor a known error.
    #[error("Unexpected SMS-Activate response: {raw}")]
    UnexpectedResponse { raw: String },
}

pub type Result<T> = std::result::Result<T, SmsActivateError>;

impl SmsActivateError {
    /// Build the error for a response that is not the expected success sentinel.
    pub(crate) fn rejected(raw: &str) -> Self {
        match parse_sms_activate_error(raw) {
            Some(error) => Self::Service(error),
            None => Self::UnexpectedResponse {
                raw: raw.trim().to_string(),
            },
        }
    }
}

impl ClassifiedError for SmsActivateError {
    fn kind(&self) -> ErrorKind {
        match self {
            SmsActivateError::MissingApiKey => ErrorKind::ConfigMissing,
            SmsActivateError::HttpRequest(_) | SmsActivateError::ReadResponse(_) => {
                ErrorKind::UpstreamUnreachable
            }
            SmsActivateError::Service(_)
            | SmsActivateError::HttpStatus { .. }
            | SmsActivateError::UnexpectedResponse { .. } => ErrorKind::UpstreamRejected,
            SmsActivateError::BuildHttpClient(_)
            | SmsActivateError::InvalidEndpoint(_)
            | SmsActivateError::BuildRequestUrl(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_errors() {
        let test_cases = vec![
            ("NO_ACTIVATION", SmsActivateErrorCode::NoActivation),
            ("NO_BALANCE", SmsActivateErrorCode::NoBalance),
            ("ERROR_SQL", SmsActivateErrorCode::ErrorSql),
            ("BAD_KEY", SmsActivateErrorCode::BadKey),
            ("NO_NUMBERS", SmsActivateErrorCode::NoNumbers),
        ];

        for (input, expected) in test_cases {
            let error = parse_sms_activate_error(input).unwrap();
            assert_eq!(error.code, expected);
            assert_eq!(error.raw, input);
        }
    }

    #[test]
    fn test_parse_banned_error() {
        let error = parse_sms_activate_error("BANNED:'2025-12-31 23:59:59'").unwrap();
        assert_eq!(
            error.code,
            SmsActivateErrorCode::Banned {
                until: "2025-12-31 23:59:59".to_string()
            }
        );
    }

    #[test]
    fn test_parse_wrong_max_price() {
        let error = parse_sms_activate_error("WRONG_MAX_PRICE:10.5").unwrap();
        assert_eq!(
            error.code,
            SmsActivateErrorCode::WrongMaxPrice { min: Some(10.5) }
        );
    }

    #[test]
    fn test_success_sentinels_not_treated_as_errors() {
        assert!(parse_sms_activate_error("ACCESS_NUMBER:1:79001234567").is_none());
        assert!(parse_sms_activate_error("ACCESS_BALANCE:12.50").is_none());
        assert!(parse_sms_activate_error("STATUS_WAIT_CODE").is_none());
        assert!(parse_sms_activate_error("").is_none());
    }

    #[test]
    fn test_unknown_error_like_code() {
        let error = parse_sms_activate_error("NO_SUCH_THING").unwrap();
        assert_eq!(
            error.code,
            SmsActivateErrorCode::Unknown {
                raw: "NO_SUCH_THING".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_keeps_raw_text() {
        let err = SmsActivateError::rejected("NO_NUMBERS");
        assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
        assert!(err.to_string().contains("NO_NUMBERS"));

        let err = SmsActivateError::rejected("<html>oops</html>");
        assert!(matches!(err, SmsActivateError::UnexpectedResponse { .. }));
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[test]
    fn test_missing_key_is_config_missing() {
        assert!(SmsActivateError::MissingApiKey.is_config_missing());
        assert_eq!(
            SmsActivateError::MissingApiKey.to_string(),
            "SMS-Activate API key not configured"
        );
    }
}
