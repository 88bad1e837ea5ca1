//! # SMS Gateway
//!
//! A provider-agnostic gateway over virtual SIM SMS-reception services.
//!
//! Callers rent a temporary phone number for a service (Telegram, WhatsApp,
//! ...), poll for the verification code sent to it, check account balances,
//! and cancel rentals, through one interface regardless of which provider
//! holds the number.
//!
//! ## Supported Providers
//!
//! | Provider | Name | Protocol | Website |
//! |----------|------|----------|---------|
//! | SMS Activate | `sms-activate` | sentinel text over query-string GET | <https://sms-activate.org> |
//! | 5sim | `5sim` | JSON REST, bearer token | <https://5sim.net> |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_gateway::{GatewayConfig, RentRequest, SmsGateway, SmsGatewayTrait};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::builder()
//!         .sms_activate_api_key("your_api_key")
//!         .build()?;
//!     let gateway = SmsGateway::from_config(&config)?;
//!
//!     // Rent a number for Telegram from the default provider
//!     let rental = gateway.rent_number(RentRequest::new("tg")).await?;
//!     println!("Got number: {}", rental.number);
//!
//!     // Poll once
//!     let status = gateway
//!         .poll_status(&rental.id, Some(rental.provider.as_str()))
//!         .await?;
//!     println!("Status: {}", status.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  REST binding (axum)        GatewayClient
//!         │                        │ HTTP
//!         ▼                        ▼
//!  SmsGatewayTrait ◄──────── running gateway
//!         │
//!         ▼
//!     SmsGateway       (resolves provider by name)
//!         │
//!         ▼
//!     AnyProvider      (enum dispatch)
//!      ┌──┴──────────────┐
//!      ▼                 ▼
//! SmsActivateProvider  FiveSimProvider   (trait: Provider)
//! ```
//!
//! ## Features
//!
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)
//! - `server` - axum REST binding and the `sms-gateway` binary (enabled by default)

pub mod client;
pub mod errors;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod types;
mod utils;

// Re-export commonly used types at the crate root
pub use client::{GatewayClient, GatewayClientError, ReceivedCode, WaitConfig};
pub use errors::{ClassifiedError, ErrorKind};
pub use providers::{AnyProvider, Provider, ProviderError};
pub use service::{
    ConfigError, GatewayConfig, GatewayConfigBuilder, GatewayError, ProviderSettings, SmsGateway,
    SmsGatewayTrait,
};
pub use types::{
    Balance, CancelReceipt, ErrorResponse, GatewayInfo, PhoneNumber, ProviderKind, RentRequest,
    Rental, RentalId, SmsCode, SmsReport, SmsStatus, StatusResult, UnknownProviderError,
};

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
