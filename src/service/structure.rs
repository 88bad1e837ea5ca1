//! Main gateway implementation.

use super::config::{ConfigError, GatewayConfig};
use super::error::GatewayError;
use super::traits::SmsGatewayTrait;
use crate::providers::five_sim::{FiveSimClient, FiveSimProvider};
use crate::providers::sms_activate::{SmsActivateClient, SmsActivateProvider};
use crate::providers::{AnyProvider, Provider, ProviderError};
use crate::types::{
    Balance, CancelReceipt, GatewayInfo, ProviderKind, RentRequest, Rental, RentalId,
    StatusResult,
};
use crate::utils::http::build_http_client;
use std::collections::BTreeMap;

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// Name reported by [`SmsGatewayTrait::info`].
pub const GATEWAY_NAME: &str = "SMS Gateway API";

/// Provider-agnostic SMS gateway.
///
/// Resolves the provider named by each request (or the configured default)
/// and forwards the call to its adapter. The gateway holds no per-request
/// state; clones share the pooled HTTP client.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::{GatewayConfig, RentRequest, SmsGateway, SmsGatewayTrait};
///
/// let config = GatewayConfig::from_env()?;
/// let gateway = SmsGateway::from_config(&config)?;
///
/// let rental = gateway.rent_number(RentRequest::new("tg")).await?;
/// let status = gateway.poll_status(&rental.id, Some(rental.provider.as_str())).await?;
/// println!("{}: {}", rental.number, status.status());
/// ```
#[derive(Debug, Clone)]
pub struct SmsGateway {
    providers: BTreeMap<ProviderKind, AnyProvider>,
    default_provider: ProviderKind,
}

impl SmsGateway {
    /// Create a gateway over the given adapters.
    ///
    /// A later adapter of the same kind replaces an earlier one.
    pub fn new(
        providers: impl IntoIterator<Item = AnyProvider>,
        default_provider: ProviderKind,
    ) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.kind(), provider))
            .collect();

        Self {
            providers,
            default_provider,
        }
    }

    /// Build every adapter from the configuration, sharing one HTTP client.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let http_client =
            build_http_client(config.request_timeout).map_err(ConfigError::HttpClient)?;

        let sms_activate = SmsActivateClient::builder()
            .maybe_api_key(config.sms_activate.api_key.clone())
            .endpoint(config.sms_activate.endpoint.clone())
            .http_client(http_client.clone())
            .build()
            .map_err(|e| ConfigError::ProviderSetup {
                provider: ProviderKind::SmsActivate,
                source: ProviderError::from(e),
            })?;

        let five_sim = FiveSimClient::builder()
            .maybe_api_key(config.five_sim.api_key.clone())
            .base_url(config.five_sim.endpoint.clone())
            .http_client(http_client)
            .build()
            .map_err(|e| ConfigError::ProviderSetup {
                provider: ProviderKind::FiveSim,
                source: ProviderError::from(e),
            })?;

        #[cfg(feature = "tracing")]
        info!(
            default_provider = %config.default_provider,
            sms_activate_configured = config.sms_activate.is_configured(),
            five_sim_configured = config.five_sim.is_configured(),
            timeout_secs = %config.request_timeout.as_secs_f64(),
            "SMS gateway configured"
        );

        Ok(Self::new(
            [
                AnyProvider::from(SmsActivateProvider::new(sms_activate)),
                AnyProvider::from(FiveSimProvider::new(five_sim)),
            ],
            config.default_provider,
        ))
    }

    /// Provider used when a request names none.
    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Get reference to the adapter of the given provider.
    pub fn provider(&self, kind: ProviderKind) -> Option<&AnyProvider> {
        self.providers.get(&kind)
    }

    /// Pick the adapter named by `name`, or the default one.
    fn resolve(&self, name: Option<&str>) -> Result<&AnyProvider, GatewayError> {
        let kind = match name {
            Some(name) => name.parse::<ProviderKind>()?,
            None => self.default_provider,
        };

        self.providers
            .get(&kind)
            .ok_or_else(|| GatewayError::InvalidRequest(format!("Provider not available: {kind}")))
    }
}

fn require_non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str, GatewayError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GatewayError::InvalidRequest(format!("{what} must not be empty")));
    }
    Ok(value)
}

impl SmsGatewayTrait for SmsGateway {
    fn info(&self) -> GatewayInfo {
        GatewayInfo {
            name: GATEWAY_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            providers: ProviderKind::ALL.to_vec(),
            configured_providers: self
                .providers
                .values()
                .filter(|provider| provider.is_configured())
                .map(|provider| provider.kind())
                .collect(),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsGateway::rent_number",
            skip_all,
            fields(service = %request.service, provider = ?request.provider)
        )
    )]
    async fn rent_number(&self, request: RentRequest) -> Result<Rental, GatewayError> {
        let service = require_non_blank(&request.service, "Service code")?;
        let provider = self.resolve(request.provider.as_deref())?;
        let country = request
            .country
            .as_deref()
            .filter(|country| !country.trim().is_empty());

        let rental = provider.rent(service, country).await?;

        #[cfg(feature = "tracing")]
        info!(
            rental_id = %rental.id,
            provider = %rental.provider,
            cost = %rental.cost,
            "Number rented"
        );

        Ok(rental)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsGateway::poll_status",
            skip_all,
            fields(rental_id = %id, provider = ?provider)
        )
    )]
    async fn poll_status(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> Result<StatusResult, GatewayError> {
        let id = RentalId::from(require_non_blank(id.as_str(), "Rental id")?);
        let provider = self.resolve(provider)?;

        let result = provider.poll(&id).await?;

        #[cfg(feature = "tracing")]
        debug!(status = %result.status(), "Status polled");

        Ok(result)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "SmsGateway::balances", skip_all)
    )]
    async fn balances(&self) -> Vec<Balance> {
        let mut balances = Vec::new();

        for provider in self.providers.values() {
            if !provider.is_configured() {
                continue;
            }

            match provider.balance().await {
                Ok(balance) => balances.push(Balance {
                    provider: provider.kind(),
                    balance,
                }),
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    warn!(
                        provider = %provider.kind(),
                        error = %_e,
                        "Failed to read balance, leaving provider out"
                    );
                }
            }
        }

        balances
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsGateway::cancel",
            skip_all,
            fields(rental_id = %id, provider = ?provider)
        )
    )]
    async fn cancel(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> Result<CancelReceipt, GatewayError> {
        let id = RentalId::from(require_non_blank(id.as_str(), "Rental id")?);
        let provider = self.resolve(provider)?;

        let response = provider.cancel(&id).await?;

        #[cfg(feature = "tracing")]
        info!(provider = %provider.kind(), "Rental cancelled");

        Ok(CancelReceipt::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_gateway() -> SmsGateway {
        let config = GatewayConfig::builder().build().unwrap();
        SmsGateway::from_config(&config).unwrap()
    }

    #[test]
    fn test_info_lists_configured_providers() {
        let config = GatewayConfig::builder()
            .five_sim_api_key("token")
            .build()
            .unwrap();
        let gateway = SmsGateway::from_config(&config).unwrap();

        let info = gateway.info();
        assert_eq!(info.name, "SMS Gateway API");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            info.providers,
            vec![ProviderKind::SmsActivate, ProviderKind::FiveSim]
        );
        assert_eq!(info.configured_providers, vec![ProviderKind::FiveSim]);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_invalid_request() {
        let gateway = unconfigured_gateway();
        let id = RentalId::from("1");

        let rent = gateway
            .rent_number(RentRequest::new("tg").with_provider("twilio"))
            .await
            .unwrap_err();
        let poll = gateway.poll_status(&id, Some("twilio")).await.unwrap_err();
        let cancel = gateway.cancel(&id, Some("twilio")).await.unwrap_err();

        for err in [rent, poll, cancel] {
            assert_eq!(
                err,
                GatewayError::InvalidRequest("Unknown provider: twilio".to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_invalid_request() {
        let gateway = unconfigured_gateway();

        let err = gateway
            .rent_number(RentRequest::new("  "))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("Service code must not be empty".to_string())
        );

        let err = gateway
            .poll_status(&RentalId::from(""), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("Rental id must not be empty".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_credential_is_invalid_request() {
        let gateway = unconfigured_gateway();

        let err = gateway
            .rent_number(RentRequest::new("tg"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("SMS-Activate API key not configured".to_string())
        );

        let err = gateway
            .cancel(&RentalId::from("42"), Some("5sim"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("5SIM API key not configured".to_string())
        );
    }

    #[tokio::test]
    async fn test_balances_without_configured_providers_is_empty() {
        assert!(unconfigured_gateway().balances().await.is_empty());
    }

    #[test]
    fn test_new_keeps_last_adapter_per_kind() {
        let first = SmsActivateProvider::new(SmsActivateClient::builder().build().unwrap());
        let second = SmsActivateProvider::new(SmsActivateClient::with_api_key("key").unwrap());

        let gateway = SmsGateway::new(
            [AnyProvider::from(first), AnyProvider::from(second)],
            ProviderKind::SmsActivate,
        );

        assert!(
            gateway
                .provider(ProviderKind::SmsActivate)
                .is_some_and(|p| p.is_configured())
        );
        assert!(gateway.provider(ProviderKind::FiveSim).is_none());
    }
}
