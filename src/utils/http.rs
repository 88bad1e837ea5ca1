//! Shared outbound HTTP client construction.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;

/// Default timeout applied to every outbound provider call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the pooled HTTP client used by the adapters.
///
/// The client is cheap to clone; every clone shares the same connection pool.
pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(ClientBuilder::new(client).build())
}
