//! 5sim HTTP client.

use super::errors::{FiveSimError, Result};
use super::types::{Order, Profile};
use crate::types::RentalId;
use crate::utils::http::{DEFAULT_REQUEST_TIMEOUT, build_http_client};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Default 5sim API base URL.
pub const DEFAULT_API_URL: &str = "https://5sim.net/v1";

/// 5sim HTTP client.
///
/// Speaks the 5sim user API: path-addressed GET requests authenticated with a
/// bearer token, JSON answers.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::providers::five_sim::FiveSimClient;
///
/// let client = FiveSimClient::with_api_key("your_token")?;
/// let order = client.buy_activation("russia", "any", "telegram").await?;
/// println!("Got order: {}", order.id);
/// ```
#[derive(Clone)]
pub struct FiveSimClient {
    http_client: ClientWithMiddleware,
    api_key: Option<SecretString>,
    base_url: Url,
}

impl std::fmt::Debug for FiveSimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiveSimClient")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Builder for configuring a [`FiveSimClient`].
#[derive(Default)]
pub struct FiveSimClientBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    http_client: Option<ClientWithMiddleware>,
}

impl FiveSimClientBuilder {
    /// Create a new builder without an API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set or clear the API token.
    pub fn maybe_api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set a custom API base URL.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the [`FiveSimClient`].
    pub fn build(self) -> Result<FiveSimClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_URL).map_err(FiveSimError::InvalidEndpoint)?,
        };

        if base_url.cannot_be_a_base() {
            return Err(FiveSimError::EndpointNotABase {
                endpoint: base_url.to_string(),
            });
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                build_http_client(DEFAULT_REQUEST_TIMEOUT).map_err(FiveSimError::BuildHttpClient)?
            }
        };

        Ok(FiveSimClient {
            http_client,
            api_key: self.api_key,
            base_url,
        })
    }
}

impl FiveSimClient {
    /// Create a new client against a custom base URL.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(FiveSimError::InvalidEndpoint)?;
        Self::builder().api_key(api_key).base_url(url).build()
    }

    /// Create a new client with the default API URL.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> FiveSimClientBuilder {
        FiveSimClientBuilder::new()
    }

    /// Returns true when an API token is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn build_request_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FiveSimError::EndpointNotABase {
                endpoint: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authenticated GET request and return the status and body.
    async fn send_request(&self, url: Url) -> Result<(StatusCode, String)> {
        let api_key = self.api_key.as_ref().ok_or(FiveSimError::MissingApiKey)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(api_key.expose_secret())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(FiveSimError::HttpRequest)?;

        let status = response.status();
        let text = response.text().await.map_err(FiveSimError::ReadResponse)?;

        Ok((status, text))
    }

    /// Send a request and decode a JSON success body.
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.build_request_url(segments)?;
        let (status, text) = self.send_request(url).await?;

        if !status.is_success() {
            return Err(FiveSimError::Rejected {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }

        serde_json::from_str(&text).map_err(|source| FiveSimError::UnexpectedResponse {
            raw: text.trim().to_string(),
            source,
        })
    }

    /// Buy an activation number.
    ///
    /// # Arguments
    /// * `country` - 5sim country name (e.g. `russia`, `england`)
    /// * `operator` - operator name, `any` for no preference
    /// * `product` - 5sim product name (e.g. `telegram`)
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "FiveSimClient::buy_activation",
            skip_all,
            fields(country = %country, product = %product, rental_id)
        )
    )]
    pub async fn buy_activation(
        &self,
        country: &str,
        operator: &str,
        product: &str,
    ) -> Result<Order> {
        let order: Order = self
            .get_json(&["user", "buy", "activation", country, operator, product])
            .await?;

        if order.phone.as_deref().is_none_or(|phone| phone.trim().is_empty()) {
            return Err(FiveSimError::IncompleteOrder {
                id: order.id.to_string(),
                field: "phone",
            });
        }

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("rental_id", order.id.as_str())
                .set_status(Status::Ok);
        }

        Ok(order)
    }

    /// Fetch the current state of an order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "FiveSimClient::check_order",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    pub async fn check_order(&self, id: &RentalId) -> Result<Order> {
        self.get_json(&["user", "check", id.as_str()]).await
    }

    /// Fetch the account profile.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "FiveSimClient::profile", skip_all)
    )]
    pub async fn profile(&self) -> Result<Profile> {
        self.get_json(&["user", "profile"]).await
    }

    /// Cancel an order and return the raw answer, whatever its status.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "FiveSimClient::cancel_order",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    pub async fn cancel_order(&self, id: &RentalId) -> Result<String> {
        let url = self.build_request_url(&["user", "cancel", id.as_str()])?;
        let (_, text) = self.send_request(url).await?;
        Ok(text)
    }
}
