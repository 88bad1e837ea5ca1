//! SMS provider implementations.

mod any;
pub(crate) mod traits;

pub mod five_sim;
pub mod sms_activate;

pub use any::{AnyProvider, ProviderError};
pub use traits::Provider;
