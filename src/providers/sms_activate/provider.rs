//! sms-activate provider implementation.

use super::client::SmsActivateClient;
use super::errors::{Result, SmsActivateError};
use super::response::StatusResponse;
use super::types::ActivationStatus;
use crate::providers::traits::Provider;
use crate::types::{ProviderKind, Rental, RentalId, StatusResult};
use rust_decimal::Decimal;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Country id sms-activate uses when the caller does not pick one (Russia).
pub const DEFAULT_COUNTRY: &str = "0";

/// sms-activate provider.
///
/// This wraps the [`SmsActivateClient`] and implements the generic
/// [`Provider`] trait on top of the sentinel text protocol.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::providers::sms_activate::{SmsActivateClient, SmsActivateProvider};
/// use sms_gateway::Provider;
///
/// let client = SmsActivateClient::with_api_key("your_api_key")?;
/// let provider = SmsActivateProvider::new(client);
///
/// let rental = provider.rent("tg", None).await?;
/// let status = provider.poll(&rental.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SmsActivateProvider {
    client: SmsActivateClient,
}

impl SmsActivateProvider {
    /// Create a new sms-activate provider.
    pub fn new(client: SmsActivateClient) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &SmsActivateClient {
        &self.client
    }
}

impl Provider for SmsActivateProvider {
    type Error = SmsActivateError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::SmsActivate
    }

    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    fn default_country(&self) -> &'static str {
        DEFAULT_COUNTRY
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateProvider::rent",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn rent(&self, service: &str, country: Option<&str>) -> Result<Rental> {
        let country = country.unwrap_or(DEFAULT_COUNTRY);
        let assignment = self.client.get_number(service, country).await?;

        // getNumber does not report the price.
        Ok(Rental {
            id: assignment.id,
            number: assignment.number,
            provider: ProviderKind::SmsActivate,
            service: service.to_string(),
            cost: Decimal::ZERO,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateProvider::poll",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    async fn poll(&self, id: &RentalId) -> Result<StatusResult> {
        let result = match self.client.get_status(id).await? {
            Some(StatusResponse::Ok(code)) => {
                // The handler API returns the code only; it doubles as the text.
                let text = code.to_string();
                StatusResult::completed(code, Some(text))
            }
            Some(StatusResponse::WaitCode) => StatusResult::waiting(),
            Some(StatusResponse::Other(raw)) => StatusResult::passthrough(&raw),
            None => StatusResult::passthrough("error"),
        };

        #[cfg(feature = "tracing")]
        debug!(status = %result.status(), "Polled sms-activate status");

        Ok(result)
    }

    async fn balance(&self) -> Result<Decimal> {
        if !self.is_configured() {
            return Ok(Decimal::ZERO);
        }

        let balance = self.client.get_balance().await?;
        Ok(balance.max(Decimal::ZERO))
    }

    async fn cancel(&self, id: &RentalId) -> Result<String> {
        let raw = self
            .client
            .set_status(id, ActivationStatus::Cancel)
            .await?;

        #[cfg(feature = "tracing")]
        debug!(rental_id = %id, response = %raw, "Activation cancel requested");

        Ok(raw)
    }
}
