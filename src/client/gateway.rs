//! HTTP client for the gateway's REST binding.

use super::config::WaitConfig;
use super::error::{GatewayClientError, Result};
use crate::types::{
    Balance, CancelReceipt, ErrorResponse, GatewayInfo, ProviderKind, RentRequest, Rental,
    RentalId, SmsCode, SmsReport, SmsStatus,
};
use crate::utils::http::{DEFAULT_REQUEST_TIMEOUT, build_http_client};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// A code delivered to a rental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCode {
    /// The verification code.
    pub code: SmsCode,
    /// Full message text, when the provider returns it.
    pub full_text: Option<String>,
}

/// Client of a running SMS gateway.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::{CancellationToken, GatewayClient, RentRequest, WaitConfig};
///
/// let client = GatewayClient::new("http://localhost:8080")?;
/// let rental = client.rent(&RentRequest::new("tg")).await?;
/// let received = client
///     .wait_for_code(&rental, &WaitConfig::default(), CancellationToken::new())
///     .await?;
/// println!("Code for {}: {}", rental.number, received.code);
/// ```
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: ClientWithMiddleware,
    base_url: Url,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(GatewayClientError::InvalidBaseUrl)?;
        let http_client =
            build_http_client(DEFAULT_REQUEST_TIMEOUT).map_err(GatewayClientError::BuildHttpClient)?;
        Self::with_http_client(base_url, http_client)
    }

    /// Create a client with a custom HTTP client with middleware.
    pub fn with_http_client(base_url: Url, http_client: ClientWithMiddleware) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayClientError::BaseUrlNotABase {
                url: base_url.to_string(),
            });
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayClientError::BaseUrlNotABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(GatewayClientError::ReadResponse)?;

        if !status.is_success() {
            let (error, detail) = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(body) => (body.error, body.detail),
                Err(_) => ("http_error".to_string(), text.trim().to_string()),
            };
            return Err(GatewayClientError::Api {
                status: status.as_u16(),
                error,
                detail,
            });
        }

        serde_json::from_str(&text).map_err(|source| GatewayClientError::UnexpectedResponse {
            status: status.as_u16(),
            raw: text.trim().to_string(),
            source,
        })
    }

    fn with_provider(request: RequestBuilder, provider: Option<ProviderKind>) -> RequestBuilder {
        match provider {
            Some(provider) => request.query(&[("provider", provider.as_str())]),
            None => request,
        }
    }

    /// Describe the gateway.
    pub async fn info(&self) -> Result<GatewayInfo> {
        let url = self.url(&[])?;
        self.send(self.http_client.get(url)).await
    }

    /// Rent a number.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "GatewayClient::rent",
            skip_all,
            fields(service = %request.service)
        )
    )]
    pub async fn rent(&self, request: &RentRequest) -> Result<Rental> {
        let url = self.url(&["number"])?;
        self.send(self.http_client.post(url).json(request)).await
    }

    /// Poll a rental once.
    pub async fn sms_status(
        &self,
        id: &RentalId,
        provider: Option<ProviderKind>,
    ) -> Result<SmsReport> {
        let url = self.url(&["sms", id.as_str()])?;
        self.send(Self::with_provider(self.http_client.get(url), provider))
            .await
    }

    /// Balances of every configured provider.
    pub async fn balances(&self) -> Result<Vec<Balance>> {
        let url = self.url(&["balance"])?;
        self.send(self.http_client.get(url)).await
    }

    /// Cancel a rental.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "GatewayClient::cancel",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    pub async fn cancel(
        &self,
        id: &RentalId,
        provider: Option<ProviderKind>,
    ) -> Result<CancelReceipt> {
        let url = self.url(&["cancel", id.as_str()])?;
        self.send(Self::with_provider(self.http_client.post(url), provider))
            .await
    }

    async fn cancel_after_failure(&self, rental: &Rental, config: &WaitConfig) {
        if !config.cancel_on_failure {
            return;
        }

        if let Err(_e) = self.cancel(&rental.id, Some(rental.provider)).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Failed to cancel rental after failed wait");
        }
    }

    /// Poll `rental` until a code arrives.
    ///
    /// Transport failures and 5xx answers are logged and polling continues.
    /// Any status other than `waiting` or `completed` ends the wait. On
    /// timeout, unexpected status, or a non-transient error the rental is
    /// cancelled (best effort) unless [`WaitConfig::cancel_on_failure`] is
    /// off. Triggering `cancel_token` ends the wait without touching the
    /// rental.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "GatewayClient::wait_for_code",
            skip_all,
            fields(rental_id = %rental.id, provider = %rental.provider)
        )
    )]
    pub async fn wait_for_code(
        &self,
        rental: &Rental,
        config: &WaitConfig,
        cancel_token: CancellationToken,
    ) -> Result<ReceivedCode> {
        let start = Instant::now();
        let mut poll_count: u32 = 0;

        #[cfg(feature = "tracing")]
        debug!(timeout_secs = %config.timeout.as_secs_f64(), "Starting SMS code polling");

        loop {
            if start.elapsed() >= config.timeout {
                #[cfg(feature = "tracing")]
                warn!(
                    timeout_secs = %config.timeout.as_secs_f64(),
                    poll_count,
                    "Timeout reached, cancelling rental"
                );

                self.cancel_after_failure(rental, config).await;

                return Err(GatewayClientError::Timeout {
                    timeout: config.timeout,
                    elapsed: start.elapsed(),
                    poll_count,
                    rental_id: rental.id.clone(),
                });
            }

            poll_count += 1;
            let polled = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    return Err(GatewayClientError::Cancelled {
                        elapsed: start.elapsed(),
                        poll_count,
                        rental_id: rental.id.clone(),
                    });
                }
                polled = self.sms_status(&rental.id, Some(rental.provider)) => polled,
            };

            match polled {
                Ok(SmsReport {
                    status: SmsStatus::Completed,
                    code: Some(code),
                    full_text,
                    ..
                }) => {
                    #[cfg(feature = "tracing")]
                    info!(
                        code = %code,
                        elapsed_secs = %start.elapsed().as_secs_f64(),
                        poll_count,
                        "SMS code received"
                    );
                    return Ok(ReceivedCode { code, full_text });
                }
                Ok(SmsReport {
                    status: SmsStatus::Waiting,
                    ..
                }) => {
                    // SMS not yet received, continue polling
                }
                Ok(report) => {
                    #[cfg(feature = "tracing")]
                    warn!(status = %report.status, "Rental left the waiting state without a code");

                    self.cancel_after_failure(rental, config).await;

                    return Err(GatewayClientError::UnexpectedStatus {
                        status: report.status,
                        rental_id: rental.id.clone(),
                    });
                }
                Err(_e) if _e.is_transient() => {
                    #[cfg(feature = "tracing")]
                    warn!(error = %_e, "Transient error during polling, continuing");
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    warn!(error = %e, "Permanent error during polling");

                    self.cancel_after_failure(rental, config).await;
                    return Err(e);
                }
            }

            let remaining = config.timeout.saturating_sub(start.elapsed());
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    return Err(GatewayClientError::Cancelled {
                        elapsed: start.elapsed(),
                        poll_count,
                        rental_id: rental.id.clone(),
                    });
                }
                _ = tokio::time::sleep(config.poll_interval.min(remaining)) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_segments() {
        let client = GatewayClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.url(&["sms", "12345"]).unwrap().as_str(),
            "http://localhost:8080/sms/12345"
        );
        assert_eq!(client.url(&[]).unwrap().as_str(), "http://localhost:8080/");

        let client = GatewayClient::new("http://localhost:8080/gateway/").unwrap();
        assert_eq!(
            client.url(&["balance"]).unwrap().as_str(),
            "http://localhost:8080/gateway/balance"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            GatewayClient::new("mailto:ops@example.com"),
            Err(GatewayClientError::BaseUrlNotABase { .. })
        ));
    }
}
