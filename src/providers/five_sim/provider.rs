//! 5sim provider implementation.

use super::client::FiveSimClient;
use super::errors::{FiveSimError, Result};
use super::types::Order;
use crate::errors::{ClassifiedError, ErrorKind};
use crate::providers::traits::Provider;
use crate::types::{PhoneNumber, ProviderKind, Rental, RentalId, SmsCode, StatusResult};
use rust_decimal::Decimal;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Country name 5sim uses when the caller does not pick one.
pub const DEFAULT_COUNTRY: &str = "russia";

/// Operator selector meaning "any operator".
pub const ANY_OPERATOR: &str = "any";

/// 5sim provider.
///
/// This wraps the [`FiveSimClient`] and implements the generic [`Provider`]
/// trait on top of the JSON order API.
#[derive(Debug, Clone)]
pub struct FiveSimProvider {
    client: FiveSimClient,
}

impl FiveSimProvider {
    /// Create a new 5sim provider.
    pub fn new(client: FiveSimClient) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &FiveSimClient {
        &self.client
    }
}

/// Map an order onto the normalized status vocabulary.
///
/// `RECEIVED` means the number was handed out; it only counts as completed
/// once a message with a code is attached.
fn classify_order(order: &Order) -> StatusResult {
    match order.status.trim() {
        "PENDING" | "WAITING" => StatusResult::waiting(),
        "RECEIVED" => match order.first_code() {
            Some(sms) => {
                let code = sms.code.as_deref().unwrap_or_default().trim();
                StatusResult::completed(SmsCode::new(code), sms.text.clone())
            }
            None => StatusResult::waiting(),
        },
        "" => StatusResult::passthrough("unknown"),
        other => StatusResult::passthrough(other),
    }
}

impl Provider for FiveSimProvider {
    type Error = FiveSimError;

    fn kind(&self) -> ProviderKind {
        ProviderKind::FiveSim
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
            name = "FiveSimProvider::rent",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn rent(&self, service: &str, country: Option<&str>) -> Result<Rental> {
        let country = country.unwrap_or(DEFAULT_COUNTRY);
        let order = self
            .client
            .buy_activation(country, ANY_OPERATOR, service)
            .await?;

        Ok(Rental {
            id: order.id,
            number: PhoneNumber::from(order.phone.unwrap_or_default()),
            provider: ProviderKind::FiveSim,
            service: service.to_string(),
            cost: order.price.max(Decimal::ZERO),
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "FiveSimProvider::poll",
            skip_all,
            fields(rental_id = %id)
        )
    )]
    async fn poll(&self, id: &RentalId) -> Result<StatusResult> {
        let result = match self.client.check_order(id).await {
            Ok(order) => classify_order(&order),
            Err(e) if e.kind() == ErrorKind::UpstreamRejected => {
                #[cfg(feature = "tracing")]
                warn!(error = %e, "5sim rejected status check");

                StatusResult::passthrough("error")
            }
            Err(e) => return Err(e),
        };

        #[cfg(feature = "tracing")]
        debug!(status = %result.status(), "Polled 5sim order");

        Ok(result)
    }

    async fn balance(&self) -> Result<Decimal> {
        if !self.is_configured() {
            return Ok(Decimal::ZERO);
        }

        let profile = self.client.profile().await?;
        Ok(profile.balance.max(Decimal::ZERO))
    }

    async fn cancel(&self, id: &RentalId) -> Result<String> {
        let raw = self.client.cancel_order(id).await?;

        #[cfg(feature = "tracing")]
        debug!(rental_id = %id, "Order cancel requested");

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SmsStatus;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer) -> FiveSimProvider {
        let client = FiveSimClient::new(mock_server.uri(), "test_token").unwrap();
        FiveSimProvider::new(client)
    }

    async fn mount_order(mock_server: &MockServer, order: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/user/check/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(order))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_rent_reports_price() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/buy/activation/england/any/telegram"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42,
                "phone": "+447000000000",
                "price": 12.5,
                "status": "PENDING"
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let rental = provider.rent("telegram", Some("england")).await.unwrap();

        assert_eq!(rental.id.as_str(), "42");
        assert_eq!(rental.number.as_str(), "+447000000000");
        assert_eq!(rental.provider, ProviderKind::FiveSim);
        assert_eq!(rental.service, "telegram");
        assert_eq!(rental.cost, dec!(12.5));
    }

    #[tokio::test]
    async fn test_rent_uses_default_country() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/buy/activation/russia/any/vkontakte"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "phone": "+79000000000", "price": 8, "status": "PENDING"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        assert!(provider.rent("vkontakte", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_rent_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("not enough user balance"))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let err = provider.rent("telegram", None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
        assert!(err.to_string().contains("not enough user balance"));
    }

    #[tokio::test]
    async fn test_rent_without_phone_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/buy/activation/russia/any/telegram"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 42, "status": "PENDING"})),
            )
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let err = provider.rent("telegram", None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
        assert!(err.to_string().contains("phone"));
    }

    #[tokio::test]
    async fn test_rent_blank_phone_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42, "phone": "  ", "price": 8, "status": "PENDING"
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        match provider.rent("telegram", None).await {
            Err(FiveSimError::IncompleteOrder { field, .. }) => assert_eq!(field, "phone"),
            other => panic!("Expected IncompleteOrder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_pending_is_waiting() {
        let mock_server = MockServer::start().await;
        mount_order(
            &mock_server,
            serde_json::json!({"id": 42, "status": "PENDING", "sms": null}),
        )
        .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();
        assert_eq!(result, StatusResult::waiting());
    }

    #[tokio::test]
    async fn test_poll_received_without_sms_is_waiting() {
        let mock_server = MockServer::start().await;
        mount_order(
            &mock_server,
            serde_json::json!({"id": 42, "status": "RECEIVED", "sms": []}),
        )
        .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();
        assert_eq!(result, StatusResult::waiting());
    }

    #[tokio::test]
    async fn test_poll_received_with_sms_is_completed() {
        let mock_server = MockServer::start().await;
        mount_order(
            &mock_server,
            serde_json::json!({
                "id": 42,
                "status": "RECEIVED",
                "sms": [
                    {"sender": "Telegram", "text": "Telegram code 55123", "code": "55123"},
                    {"sender": "Telegram", "text": "Telegram code 99999", "code": "99999"}
                ]
            }),
        )
        .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();

        assert_eq!(result.status(), &SmsStatus::Completed);
        assert_eq!(result.code().map(SmsCode::as_str), Some("55123"));
        assert_eq!(result.full_text(), Some("Telegram code 55123"));
    }

    #[tokio::test]
    async fn test_poll_other_status_passthrough() {
        let mock_server = MockServer::start().await;
        mount_order(
            &mock_server,
            serde_json::json!({"id": 42, "status": "CANCELED"}),
        )
        .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();

        assert_eq!(result, StatusResult::passthrough("canceled"));
    }

    #[tokio::test]
    async fn test_poll_http_error_is_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("order not found"))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();

        assert_eq!(result.status().as_str(), "error");
        assert!(result.code().is_none());
    }

    #[tokio::test]
    async fn test_poll_unparseable_body_is_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/check/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":42,\"sta"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let result = provider.poll(&RentalId::from("42")).await.unwrap();

        assert_eq!(result, StatusResult::passthrough("error"));
    }

    #[tokio::test]
    async fn test_poll_without_key_fails() {
        let provider = FiveSimProvider::new(FiveSimClient::builder().build().unwrap());
        let err = provider.poll(&RentalId::from("42")).await.unwrap_err();
        assert!(err.is_config_missing());
    }

    #[tokio::test]
    async fn test_balance() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "email": "user@example.com", "balance": 100.25, "rating": 96
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        assert_eq!(provider.balance().await.unwrap(), dec!(100.25));
    }

    #[tokio::test]
    async fn test_balance_unconfigured_is_zero() {
        let provider = FiveSimProvider::new(FiveSimClient::builder().build().unwrap());
        assert_eq!(provider.balance().await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_cancel() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/cancel/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"id":42,"status":"CANCELED"}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let ack = provider.cancel(&RentalId::from("42")).await.unwrap();
        assert_eq!(ack, r#"{"id":42,"status":"CANCELED"}"#);
    }
}
