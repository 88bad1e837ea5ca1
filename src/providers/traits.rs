//! Provider trait definition.

use crate::errors::ClassifiedError;
use crate::types::{ProviderKind, Rental, RentalId, StatusResult};
use rust_decimal::Decimal;
use std::error::Error as StdError;
use std::future::Future;

/// Capability set every SMS provider adapter implements.
///
/// Each operation maps onto exactly one outbound HTTP call. Implementations
/// are self-contained: they own their wire format, their authentication
/// scheme, and their status vocabulary, and translate all of it into the
/// normalized types of this crate.
///
/// # Contract
///
/// - No operation touches the network when the credential is missing.
/// - `poll` only fails on a missing credential or a transport failure; any
///   answer from the provider becomes a [`StatusResult`].
/// - `balance` returns zero, without failing, when the credential is missing.
/// - `cancel` is best effort and hands back the raw provider answer.
///
/// # Note on async methods
///
/// All async methods in this trait return `Send` futures, making them
/// compatible with multi-threaded executors.
///
/// # Example
///
/// ```rust,ignore
/// use sms_gateway::{Provider, ProviderKind, Rental, RentalId, StatusResult};
/// use rust_decimal::Decimal;
///
/// #[derive(Clone)]
/// struct MyProvider { /* ... */ }
///
/// impl Provider for MyProvider {
///     type Error = MyError;
///
///     fn kind(&self) -> ProviderKind { /* ... */ }
///     fn is_configured(&self) -> bool { /* ... */ }
///     fn default_country(&self) -> &'static str { "0" }
///
///     async fn rent(&self, service: &str, country: Option<&str>) -> Result<Rental, MyError> { /* ... */ }
///     async fn poll(&self, id: &RentalId) -> Result<StatusResult, MyError> { /* ... */ }
///     async fn balance(&self) -> Result<Decimal, MyError> { /* ... */ }
///     async fn cancel(&self, id: &RentalId) -> Result<String, MyError> { /* ... */ }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Provider: Send + Sync + Clone {
    /// Error type returned by provider operations.
    type Error: StdError + ClassifiedError + Send + Sync + 'static;

    /// Which provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Returns true when the credential is present.
    fn is_configured(&self) -> bool;

    /// Country selector used when the caller does not pass one.
    fn default_country(&self) -> &'static str;

    /// Rent a number for `service`.
    ///
    /// `country` is passed to the provider untranslated; `None` selects
    /// [`Provider::default_country`]. The returned rental's provider is always
    /// [`Provider::kind`].
    fn rent(
        &self,
        service: &str,
        country: Option<&str>,
    ) -> impl Future<Output = Result<Rental, Self::Error>> + Send;

    /// Poll the rental for a received code.
    fn poll(
        &self,
        id: &RentalId,
    ) -> impl Future<Output = Result<StatusResult, Self::Error>> + Send;

    /// Get the account balance.
    fn balance(&self) -> impl Future<Output = Result<Decimal, Self::Error>> + Send;

    /// Cancel the rental and return the provider's raw acknowledgement.
    fn cancel(&self, id: &RentalId) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
