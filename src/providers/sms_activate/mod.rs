//! sms-activate provider implementation.
//!
//! sms-activate exposes a single handler endpoint driven by an `action` query
//! parameter, authenticated with an `api_key` query parameter, and answers in
//! colon-delimited sentinel text (`ACCESS_NUMBER:<id>:<number>`,
//! `STATUS_OK:<code>`, `NO_NUMBERS`, ...).
//!
//! # Example
//!
//! ```rust,ignore
//! use sms_gateway::providers::sms_activate::{SmsActivateClient, SmsActivateProvider};
//! use sms_gateway::Provider;
//!
//! let client = SmsActivateClient::with_api_key("your_api_key")?;
//! let provider = SmsActivateProvider::new(client);
//!
//! let rental = provider.rent("tg", Some("0")).await?;
//! println!("Got number: {}", rental.number);
//! ```

pub mod client;
pub mod errors;
pub mod provider;
mod response;
pub mod types;

// Re-export commonly used types
pub use client::{SmsActivateClient, SmsActivateClientBuilder};
pub use errors::{SmsActivateError, SmsActivateErrorCode, SmsActivateServiceError};
pub use provider::SmsActivateProvider;
pub use response::StatusResponse;
