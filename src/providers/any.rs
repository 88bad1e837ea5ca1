//! Enum dispatch over the concrete provider adapters.

use super::five_sim::{FiveSimError, FiveSimProvider};
use super::sms_activate::{SmsActivateError, SmsActivateProvider};
use super::traits::Provider;
use crate::errors::{ClassifiedError, ErrorKind};
use crate::types::{ProviderKind, Rental, RentalId, StatusResult};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned by [`AnyProvider`], wrapping the adapter's own error.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    SmsActivate(#[from] SmsActivateError),

    #[error(transparent)]
    FiveSim(#[from] FiveSimError),
}

impl ClassifiedError for ProviderError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::SmsActivate(e) => e.kind(),
            ProviderError::FiveSim(e) => e.kind(),
        }
    }
}

/// Any of the supported provider adapters.
///
/// The gateway holds its providers as `AnyProvider` values so that a provider
/// picked by name at request time dispatches without boxing.
#[derive(Debug, Clone)]
pub enum AnyProvider {
    SmsActivate(SmsActivateProvider),
    FiveSim(FiveSimProvider),
}

impl From<SmsActivateProvider> for AnyProvider {
    fn from(provider: SmsActivateProvider) -> Self {
        AnyProvider::SmsActivate(provider)
    }
}

impl From<FiveSimProvider> for AnyProvider {
    fn from(provider: FiveSimProvider) -> Self {
        AnyProvider::FiveSim(provider)
    }
}

impl Provider for AnyProvider {
    type Error = ProviderError;

    fn kind(&self) -> ProviderKind {
        match self {
            AnyProvider::SmsActivate(p) => p.kind(),
            AnyProvider::FiveSim(p) => p.kind(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            AnyProvider::SmsActivate(p) => p.is_configured(),
            AnyProvider::FiveSim(p) => p.is_configured(),
        }
    }

    fn default_country(&self) -> &'static str {
        match self {
            AnyProvider::SmsActivate(p) => p.default_country(),
            AnyProvider::FiveSim(p) => p.default_country(),
        }
    }

    async fn rent(&self, service: &str, country: Option<&str>) -> Result<Rental, ProviderError> {
        match self {
            AnyProvider::SmsActivate(p) => Ok(p.rent(service, country).await?),
            AnyProvider::FiveSim(p) => Ok(p.rent(service, country).await?),
        }
    }

    async fn poll(&self, id: &RentalId) -> Result<StatusResult, ProviderError> {
        match self {
            AnyProvider::SmsActivate(p) => Ok(p.poll(id).await?),
            AnyProvider::FiveSim(p) => Ok(p.poll(id).await?),
        }
    }

    async fn balance(&self) -> Result<Decimal, ProviderError> {
        match self {
            AnyProvider::SmsActivate(p) => Ok(p.balance().await?),
            AnyProvider::FiveSim(p) => Ok(p.balance().await?),
        }
    }

    async fn cancel(&self, id: &RentalId) -> Result<String, ProviderError> {
        match self {
            AnyProvider::SmsActivate(p) => Ok(p.cancel(id).await?),
            AnyProvider::FiveSim(p) => Ok(p.cancel(id).await?),
        }
    }
}
