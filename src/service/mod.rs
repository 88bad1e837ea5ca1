//! Provider-agnostic gateway facade.

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod structure;
pub(crate) mod traits;

pub use config::{ConfigError, GatewayConfig, GatewayConfigBuilder, ProviderSettings};
pub use error::GatewayError;
pub use structure::SmsGateway;
pub use traits::SmsGatewayTrait;
