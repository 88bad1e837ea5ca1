//! REST binding of the gateway.
//!
//! | Method | Path | Body / query | Answer |
//! |--------|------|--------------|--------|
//! | GET | `/` | | [`GatewayInfo`](crate::GatewayInfo) |
//! | POST | `/number` | `{service, country?, provider?}` | [`Rental`](crate::Rental) |
//! | GET | `/sms/{id}` | `?provider=` | [`SmsReport`](crate::SmsReport) |
//! | GET | `/balance` | | list of [`Balance`](crate::Balance) |
//! | POST | `/cancel/{id}` | `?provider=` | [`CancelReceipt`](crate::CancelReceipt) |
//!
//! Invalid requests answer 400, provider failures 500, both with an
//! [`ErrorResponse`](crate::ErrorResponse) body.

mod error;
pub mod handlers;
mod router;

pub use error::ApiError;
pub use router::create_router;

use crate::service::{ConfigError, SmsGatewayTrait};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Environment variable holding the listen host.
pub const ENV_HOST: &str = "HOST";
/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";

/// Listen address of the REST server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read `HOST` and `PORT` from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut config = Self::default();

        if let Some(host) = vars.get(ENV_HOST).map(|h| h.trim()).filter(|h| !h.is_empty()) {
            config.host = host.to_string();
        }
        if let Some(port) = vars.get(ENV_PORT).map(|p| p.trim()).filter(|p| !p.is_empty()) {
            config.port = port.parse().map_err(|_| ConfigError::InvalidNumber {
                var: ENV_PORT,
                value: port.to_string(),
                reason: "expected a port number",
            })?;
        }

        Ok(config)
    }

    /// `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Serve the REST binding until Ctrl-C.
pub async fn serve<G: SmsGatewayTrait + 'static>(
    gateway: G,
    config: &ServerConfig,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "SMS gateway listening");

    axum::serve(listener, create_router(Arc::new(gateway)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal, shutting down..."),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
