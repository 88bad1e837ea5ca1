//! Core types shared by the adapters, the gateway, and the REST binding.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// RentalId
// =============================================================================

/// Identifier of a rental, as issued by the provider.
///
/// The value is opaque: sms-activate hands out numeric strings, 5sim integer
/// order ids. Both are carried as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RentalId(String);

impl RentalId {
    /// Create a new RentalId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RentalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RentalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for RentalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RentalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// PhoneNumber
// =============================================================================

/// Phone number exactly as the provider returned it.
///
/// sms-activate usually omits the leading `+`, 5sim includes it; no
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PhoneNumber {
    fn from(number: String) -> Self {
        Self(number)
    }
}

impl From<&str> for PhoneNumber {
    fn from(number: &str) -> Self {
        Self(number.to_string())
    }
}

// =============================================================================
// SmsCode (OTP)
// =============================================================================

/// SMS verification code (OTP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmsCode(String);

impl SmsCode {
    /// Create a new SmsCode.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SmsCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SmsCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SmsCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for SmsCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// =============================================================================
// ProviderKind
// =============================================================================

/// Error when a provider name does not match any known provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown provider: {0}")]
pub struct UnknownProviderError(pub String);

/// The SMS providers this gateway knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// <https://sms-activate.org>, sentinel text protocol.
    #[serde(rename = "sms-activate")]
    SmsActivate,
    /// <https://5sim.net>, JSON REST protocol.
    #[serde(rename = "5sim")]
    FiveSim,
}

impl ProviderKind {
    /// Every known provider, in display order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::SmsActivate, ProviderKind::FiveSim];

    /// Returns the public name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmsActivate => "sms-activate",
            Self::FiveSim => "5sim",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sms-activate" => Ok(Self::SmsActivate),
            "5sim" => Ok(Self::FiveSim),
            other => Err(UnknownProviderError(other.to_string())),
        }
    }
}

// =============================================================================
// Rental
// =============================================================================

/// A phone number rented from a provider for one verification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    /// Provider-issued rental id.
    pub id: RentalId,
    /// Rented phone number.
    pub number: PhoneNumber,
    /// Provider that owns the rental.
    pub provider: ProviderKind,
    /// Service code the number was requested for.
    pub service: String,
    /// Cost reported by the provider at rent time, zero when not reported.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
}

/// Parameters of a rent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentRequest {
    /// Provider-specific service code (e.g. `tg`, `wa`, `telegram`).
    pub service: String,
    /// Provider-specific country selector, passed through untranslated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Provider name; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl RentRequest {
    /// Create a request for the given service with provider defaults.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            country: None,
            provider: None,
        }
    }

    /// Set the country selector.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the provider name.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

// =============================================================================
// SmsStatus / StatusResult
// =============================================================================

/// Normalized state of a rental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsStatus {
    /// No code has arrived yet.
    Waiting,
    /// A code has arrived.
    Completed,
    /// Any provider state without a normalized equivalent, lower-cased.
    Other(String),
}

impl SmsStatus {
    /// Build a passthrough status from a raw provider token.
    pub fn passthrough(raw: &str) -> Self {
        Self::Other(raw.trim().to_lowercase())
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "waiting",
            Self::Completed => "completed",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl Display for SmsStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SmsStatus {
    fn from(s: &str) -> Self {
        match s {
            "waiting" => Self::Waiting,
            "completed" => Self::Completed,
            other => Self::passthrough(other),
        }
    }
}

impl Serialize for SmsStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SmsStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Outcome of a single status poll.
///
/// A `completed` result always carries a code: the only way to build one is
/// [`StatusResult::completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    status: SmsStatus,
    code: Option<SmsCode>,
    full_text: Option<String>,
}

impl StatusResult {
    /// The code has not arrived yet.
    pub fn waiting() -> Self {
        Self {
            status: SmsStatus::Waiting,
            code: None,
            full_text: None,
        }
    }

    /// The code has arrived.
    pub fn completed(code: SmsCode, full_text: Option<String>) -> Self {
        Self {
            status: SmsStatus::Completed,
            code: Some(code),
            full_text,
        }
    }

    /// Unrecognized provider state, reported lower-cased with no code.
    pub fn passthrough(raw: &str) -> Self {
        Self {
            status: SmsStatus::passthrough(raw),
            code: None,
            full_text: None,
        }
    }

    /// Normalized state.
    pub fn status(&self) -> &SmsStatus {
        &self.status
    }

    /// Received code, present iff the state is completed.
    pub fn code(&self) -> Option<&SmsCode> {
        self.code.as_ref()
    }

    /// Full message text, when the provider returns it.
    pub fn full_text(&self) -> Option<&str> {
        self.full_text.as_deref()
    }
}

/// Status poll result as exposed over REST, tagged with the rental id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsReport {
    /// Rental the status belongs to.
    pub id: RentalId,
    /// Received code.
    pub code: Option<SmsCode>,
    /// Full message text.
    pub full_text: Option<String>,
    /// Normalized state.
    pub status: SmsStatus,
}

impl SmsReport {
    /// Tag a poll result with its rental id.
    pub fn new(id: RentalId, result: StatusResult) -> Self {
        Self {
            id,
            code: result.code,
            full_text: result.full_text,
            status: result.status,
        }
    }
}

// =============================================================================
// Balance / cancel / info
// =============================================================================

/// Account balance held at one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Provider the balance belongs to.
    pub provider: ProviderKind,
    /// Amount in the provider's account currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Acknowledgement of a cancel request.
///
/// The gateway does not interpret the provider answer; `response` is the raw
/// body the provider sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReceipt {
    /// Always `cancelled`.
    pub status: String,
    /// Raw provider acknowledgement.
    pub response: String,
}

impl CancelReceipt {
    /// Wrap a raw provider acknowledgement.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            status: "cancelled".to_string(),
            response: response.into(),
        }
    }
}

/// Description of the running gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    /// Gateway name.
    pub name: String,
    /// Crate version.
    pub version: String,
    /// Every provider the gateway supports.
    pub providers: Vec<ProviderKind>,
    /// Providers with a credential configured.
    pub configured_providers: Vec<ProviderKind>,
}

/// Error body returned by the REST binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category (`invalid_request`, `internal_error`).
    pub error: String,
    /// Human-readable detail, upstream text included.
    pub detail: String,
}
