//! Gateway trait definition.

use super::error::GatewayError;
use crate::types::{
    Balance, CancelReceipt, GatewayInfo, RentRequest, Rental, RentalId, StatusResult,
};
use std::future::Future;

/// Provider-agnostic SMS gateway operations.
///
/// The REST binding is generic over this trait, so any implementation can be
/// served, not only [`crate::SmsGateway`].
pub trait SmsGatewayTrait: Send + Sync {
    /// Describe the gateway: supported and configured providers.
    fn info(&self) -> GatewayInfo;

    /// Rent a number.
    ///
    /// # Arguments
    ///
    /// * `request` - service code, optional country selector, optional provider name
    ///
    /// # Returns
    ///
    /// The rental, tagged with the provider that issued it.
    fn rent_number(
        &self,
        request: RentRequest,
    ) -> impl Future<Output = Result<Rental, GatewayError>> + Send;

    /// Poll a rental for a received code.
    ///
    /// `provider` names the provider that owns the rental; the default
    /// provider when `None`.
    fn poll_status(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> impl Future<Output = Result<StatusResult, GatewayError>> + Send;

    /// Balances of every configured provider.
    ///
    /// Providers whose balance cannot be read are left out; this never fails.
    fn balances(&self) -> impl Future<Output = Vec<Balance>> + Send;

    /// Cancel a rental.
    fn cancel(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> impl Future<Output = Result<CancelReceipt, GatewayError>> + Send;
}
