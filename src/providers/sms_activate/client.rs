//! sms-activate HTTP client.

use super::errors::{Result, SmsActivateError};
use super::response::{StatusResponse, parse_access_balance, parse_access_number};
use super::types::{ActivationStatus, NumberAssignment};
use crate::types::RentalId;
use crate::utils::http::{DEFAULT_REQUEST_TIMEOUT, build_http_client};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Default sms-activate handler API URL.
pub const DEFAULT_API_URL: &str = "https://api.sms-activate.org/stubs/handler_api.php";

/// sms-activate HTTP client.
///
/// Speaks the handler API: every call is a GET with `api_key` and `action`
/// query parameters, every answer a single line of sentinel text.
///
/// The API key is optional so that an unconfigured client can still answer
/// [`SmsActivateClient::is_configured`]; every call fails with
/// [`SmsActivateError::MissingApiKey`] before touching the network.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::providers::sms_activate::SmsActivateClient;
///
/// let client = SmsActivateClient::with_api_key("your_api_key")?;
/// let assignment = client.get_number("tg", "0").await?;
/// println!("Got number: {}", assignment.number);
/// ```
#[derive(Clone)]
pub struct SmsActivateClient {
    http_client: ClientWithMiddleware,
    api_key: Option<SecretString>,
    endpoint: Url,
}

impl std::fmt::Debug for SmsActivateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsActivateClient")
            .field("endpoint", &self.endpoint)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Builder for configuring a [`SmsActivateClient`].
#[derive(Default)]
pub struct SmsActivateClientBuilder {
    api_key: Option<SecretString>,
    endpoint: Option<Url>,
    http_client: Option<ClientWithMiddleware>,
}

impl SmsActivateClientBuilder {
    /// Create a new builder without an API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set or clear the API key.
    pub fn maybe_api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set a custom API endpoint.
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the [`SmsActivateClient`].
    pub fn build(self) -> Result<SmsActivateClient> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(DEFAULT_API_URL).map_err(SmsActivateError::InvalidEndpoint)?,
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => build_http_client(DEFAULT_REQUEST_TIMEOUT)
                .map_err(SmsActivateError::BuildHttpClient)?,
        };

        Ok(SmsActivateClient {
            http_client,
            api_key: self.api_key,
            endpoint,
        })
    }
}

impl SmsActivateClient {
    /// Create a new client against a custom endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Handler API URL
    /// * `api_key` - API key for authentication
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(endpoint.as_ref()).map_err(SmsActivateError::InvalidEndpoint)?;
        Self::builder().api_key(api_key).endpoint(url).build()
    }

    /// Create a new client with the default API URL.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> SmsActivateClientBuilder {
        SmsActivateClientBuilder::new()
    }

    /// Returns true when an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build request URL with action and parameters.
    fn build_request_url(&self, action: &str, additional: Vec<(&str, String)>) -> Result<Url> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(SmsActivateError::MissingApiKey)?;

        let mut params = vec![
            ("api_key", api_key.expose_secret().to_string()),
            ("action", action.to_string()),
        ];
        params.extend(additional);

        let mut endpoint = self.endpoint.clone();
        endpoint.set_query(Some(
            &serde_urlencoded::to_string(&params).map_err(SmsActivateError::BuildRequestUrl)?,
        ));

        Ok(endpoint)
    }

    /// Send a GET request and return the status and response text.
    async fn send_request(&self, url: Url) -> Result<(StatusCode, String)> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(SmsActivateError::HttpRequest)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(SmsActivateError::ReadResponse)?;

        Ok((status, text))
    }

    /// Rent a number.
    ///
    /// # Arguments
    /// * `service` - sms-activate service code (e.g. `tg`, `wa`)
    /// * `country` - sms-activate numeric country id (e.g. `0` for Russia)
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::get_number",
            skip_all,
            fields(service = %service, country = %country, rental_id)
        )
    )]
    pub async fn get_number(&self, service: &str, country: &str) -> Result<NumberAssignment> {
        let url = self.build_request_url(
            "getNumber",
            vec![
                ("service", service.to_string()),
                ("country", country.to_string()),
            ],
        )?;

        let (status, text) = self.send_request(url).await?;
        if !status.is_success() {
            return Err(SmsActivateError::HttpStatus {
                status: status.as_u16(),
                raw: text,
            });
        }

        let assignment = parse_access_number(&text)?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("rental_id", assignment.id.as_str())
                .set_status(Status::Ok);
        }

        Ok(assignment)
    }

    /// Get the status of an activation.
    ///
    /// Returns `None` for a non-2xx answer; the body of such an answer is not
    /// part of the status vocabulary.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::get_status",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    pub async fn get_status(&self, id: &RentalId) -> Result<Option<StatusResponse>> {
        let url = self.build_request_url("getStatus", vec![("id", id.to_string())])?;

        let (status, text) = self.send_request(url).await?;
        if !status.is_success() {
            return Ok(None);
        }

        Ok(Some(StatusResponse::from_text(&text)))
    }

    /// Get the account balance.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "SmsActivateClient::get_balance", skip_all)
    )]
    pub async fn get_balance(&self) -> Result<Decimal> {
        let url = self.build_request_url("getBalance", Vec::new())?;

        let (status, text) = self.send_request(url).await?;
        if !status.is_success() {
            return Err(SmsActivateError::HttpStatus {
                status: status.as_u16(),
                raw: text,
            });
        }

        parse_access_balance(&text)
    }

    /// Set activation status and return the raw answer.
    ///
    /// The answer is not interpreted: callers get whatever sms-activate sent
    /// back, error sentinels included.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::set_status",
            skip_all,
            fields(rental_id = %id, status = %status)
        )
    )]
    pub async fn set_status(&self, id: &RentalId, status: ActivationStatus) -> Result<String> {
        let url = self.build_request_url(
            "setStatus",
            vec![
                ("status", status.code().to_string()),
                ("id", id.to_string()),
            ],
        )?;

        let (_, text) = self.send_request(url).await?;
        Ok(text)
    }
}
