//! 5sim provider implementation.
//!
//! 5sim exposes a path-addressed JSON API under `/v1/user/...`, authenticated
//! with a bearer token.
//!
//! # Example
//!
//! ```rust,ignore
//! use sms_gateway::providers::five_sim::{FiveSimClient, FiveSimProvider};
//! use sms_gateway::Provider;
//!
//! let client = FiveSimClient::with_api_key("your_token")?;
//! let provider = FiveSimProvider::new(client);
//!
//! let rental = provider.rent("telegram", Some("england")).await?;
//! println!("Got number {} for {}", rental.number, rental.cost);
//! ```

pub mod client;
pub mod errors;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use client::{FiveSimClient, FiveSimClientBuilder};
pub use errors::FiveSimError;
pub use provider::FiveSimProvider;
