//! Client of the gateway's REST binding, with a polling helper that waits
//! for a code to arrive.

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod gateway;

pub use config::WaitConfig;
pub use error::GatewayClientError;
pub use gateway::{GatewayClient, ReceivedCode};
