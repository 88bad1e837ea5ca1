//! Types for 5sim API responses.

use crate::types::RentalId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Order returned by the buy, check, and cancel endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Order id (an integer on the wire).
    #[serde(deserialize_with = "rental_id_from_number_or_string")]
    pub id: RentalId,
    /// Phone number, with leading `+`; absent from some status answers.
    #[serde(default)]
    pub phone: Option<String>,
    /// Operator the number belongs to.
    #[serde(default)]
    pub operator: Option<String>,
    /// Product (service) the number was bought for.
    #[serde(default)]
    pub product: Option<String>,
    /// Price charged for the order.
    #[serde(default)]
    pub price: Decimal,
    /// Order status (`PENDING`, `RECEIVED`, `CANCELED`, `TIMEOUT`, `FINISHED`, `BANNED`).
    #[serde(default)]
    pub status: String,
    /// Messages received so far; `null` until the first one arrives.
    #[serde(default)]
    pub sms: Option<Vec<Sms>>,
    /// Expiry timestamp.
    #[serde(default)]
    pub expires: Option<String>,
    /// Country the number belongs to.
    #[serde(default)]
    pub country: Option<String>,
}

impl Order {
    /// First received message that carries a non-empty code.
    pub fn first_code(&self) -> Option<&Sms> {
        self.sms.as_deref().unwrap_or_default().iter().find(|sms| {
            sms.code
                .as_deref()
                .is_some_and(|code| !code.trim().is_empty())
        })
    }
}

/// A received SMS.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sms {
    /// Sender name or number.
    #[serde(default)]
    pub sender: Option<String>,
    /// Full message text.
    #[serde(default)]
    pub text: Option<String>,
    /// Verification code extracted by 5sim.
    #[serde(default)]
    pub code: Option<String>,
    /// When the message was received.
    #[serde(default)]
    pub date: Option<String>,
}

/// Account profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    /// Account e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Account balance.
    #[serde(default)]
    pub balance: Decimal,
    /// Account rating.
    #[serde(default)]
    pub rating: Option<i64>,
}

fn rental_id_from_number_or_string<'de, D>(deserializer: D) -> Result<RentalId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => RentalId::new(n.to_string()),
        NumberOrString::String(s) => RentalId::new(s),
    })
}
