//! Sentinel text parsing for the sms-activate handler API.
//!
//! Every answer is a single line: either a success sentinel such as
//! `ACCESS_NUMBER:<id>:<number>` or an error code such as `NO_NUMBERS`.

use super::errors::{Result, SmsActivateError};
use super::types::NumberAssignment;
use crate::types::{PhoneNumber, RentalId, SmsCode};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse the `getNumber` answer.
pub(crate) fn parse_access_number(text: &str) -> Result<NumberAssignment> {
    // ACCESS_NUMBER:<id>:<number>
    static RE_ACCESS_NUMBER: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^ACCESS_NUMBER:([^:\s]+):([^:\s]+)$").expect("valid ACCESS_NUMBER regex")
    });

    let text = text.trim();
    match RE_ACCESS_NUMBER.captures(text) {
        Some(cap) => Ok(NumberAssignment {
            id: RentalId::new(&cap[1]),
            number: PhoneNumber::new(&cap[2]),
        }),
        None => Err(SmsActivateError::rejected(text)),
    }
}

/// Parse the `getBalance` answer.
pub(crate) fn parse_access_balance(text: &str) -> Result<Decimal> {
    let text = text.trim();
    text.strip_prefix("ACCESS_BALANCE:")
        .and_then(|amount| Decimal::from_str(amount.trim()).ok())
        .ok_or_else(|| SmsActivateError::rejected(text))
}

/// Decoded `getStatus` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResponse {
    /// `STATUS_OK:<code>`.
    Ok(SmsCode),
    /// `STATUS_WAIT_CODE`.
    WaitCode,
    /// Any other answer, verbatim (trimmed).
    Other(String),
}

impl StatusResponse {
    /// Decode a status answer. Never fails: unknown text lands in `Other`.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();

        if text == "STATUS_WAIT_CODE" {
            return Self::WaitCode;
        }

        match text.strip_prefix("STATUS_OK:").map(str::trim) {
            Some(code) if !code.is_empty() => Self::Ok(SmsCode::new(code)),
            _ => Self::Other(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::sms_activate::errors::SmsActivateErrorCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_access_number() {
        let assignment = parse_access_number("ACCESS_NUMBER:12345:+79001234567").unwrap();
        assert_eq!(assignment.id.as_str(), "12345");
        assert_eq!(assignment.number.as_str(), "+79001234567");
    }

    #[test]
    fn test_access_number_trailing_newline() {
        let assignment = parse_access_number("ACCESS_NUMBER:1:79001234567\n").unwrap();
        assert_eq!(assignment.number.as_str(), "79001234567");
    }

    #[test]
    fn test_access_number_error_sentinel() {
        match parse_access_number("NO_NUMBERS") {
            Err(SmsActivateError::Service(error)) => {
                assert_eq!(error.code, SmsActivateErrorCode::NoNumbers);
            }
            other => panic!("Expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_access_number_truncated_is_rejected() {
        assert!(matches!(
            parse_access_number("ACCESS_NUMBER:12345"),
            Err(SmsActivateError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_access_balance() {
        assert_eq!(parse_access_balance("ACCESS_BALANCE:12.50").unwrap(), dec!(12.50));
        assert_eq!(parse_access_balance("ACCESS_BALANCE:0").unwrap(), dec!(0));
    }

    #[test]
    fn test_access_balance_bad_key() {
        assert!(matches!(
            parse_access_balance("BAD_KEY"),
            Err(SmsActivateError::Service(_))
        ));
        assert!(parse_access_balance("ACCESS_BALANCE:abc").is_err());
    }

    #[test]
    fn test_status_responses() {
        assert_eq!(
            StatusResponse::from_text("STATUS_OK:8842"),
            StatusResponse::Ok(SmsCode::new("8842"))
        );
        assert_eq!(
            StatusResponse::from_text("STATUS_WAIT_CODE"),
            StatusResponse::WaitCode
        );
        assert_eq!(
            StatusResponse::from_text("STATUS_CANCEL"),
            StatusResponse::Other("STATUS_CANCEL".to_string())
        );
        assert_eq!(
            StatusResponse::from_text("STATUS_WAIT_RETRY:1234"),
            StatusResponse::Other("STATUS_WAIT_RETRY:1234".to_string())
        );
    }

    #[test]
    fn test_status_ok_without_code_is_not_completed() {
        assert_eq!(
            StatusResponse::from_text("STATUS_OK:"),
            StatusResponse::Other("STATUS_OK:".to_string())
        );
    }
}
