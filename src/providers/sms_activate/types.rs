//! Types for sms-activate API calls.

use crate::types::{PhoneNumber, RentalId};
use std::fmt::{Display, Formatter};

/// Number handed out by a successful `getNumber` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberAssignment {
    /// Activation id.
    pub id: RentalId,
    /// Phone number, as returned.
    pub number: PhoneNumber,
}

/// Activation status codes for the setStatus API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Cancel the activation and refund it.
    Cancel,
}

impl ActivationStatus {
    /// Get the numeric status code for the API.
    pub fn code(&self) -> u8 {
        match self {
            Self::Cancel => 8,
        }
    }
}

impl Display for ActivationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancel => write!(f, "Cancel(8)"),
        }
    }
}
