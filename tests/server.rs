//! Integration tests for the REST binding.
//!
//! Router behaviour is checked against a stub gateway; one end-to-end test
//! runs the real gateway over a mocked sms-activate.

#![cfg(feature = "server")]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use sms_gateway::server::create_router;
use sms_gateway::{
    Balance, CancelReceipt, GatewayConfig, GatewayError, GatewayInfo, PhoneNumber, ProviderKind,
    RentRequest, Rental, RentalId, SmsCode, SmsGateway, SmsGatewayTrait, StatusResult,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Gateway double that answers from fixed data and records what it was asked.
#[derive(Default)]
struct StubGateway {
    failure: Option<GatewayError>,
    calls: Mutex<Vec<String>>,
}

impl StubGateway {
    fn failing(err: GatewayError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    fn record(&self, call: String) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SmsGatewayTrait for StubGateway {
    fn info(&self) -> GatewayInfo {
        GatewayInfo {
            name: "SMS Gateway API".to_string(),
            version: "test".to_string(),
            providers: ProviderKind::ALL.to_vec(),
            configured_providers: vec![ProviderKind::FiveSim],
        }
    }

    async fn rent_number(&self, request: RentRequest) -> Result<Rental, GatewayError> {
        self.record(format!(
            "rent {} {:?} {:?}",
            request.service, request.country, request.provider
        ))?;
        Ok(Rental {
            id: RentalId::from("12345"),
            number: PhoneNumber::from("+79001234567"),
            provider: ProviderKind::SmsActivate,
            service: request.service,
            cost: dec!(0),
        })
    }

    async fn poll_status(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> Result<StatusResult, GatewayError> {
        self.record(format!("poll {} {:?}", id, provider))?;
        Ok(StatusResult::completed(
            SmsCode::from("8842"),
            Some("Telegram code 8842".to_string()),
        ))
    }

    async fn balances(&self) -> Vec<Balance> {
        vec![Balance {
            provider: ProviderKind::FiveSim,
            balance: dec!(12.5),
        }]
    }

    async fn cancel(
        &self,
        id: &RentalId,
        provider: Option<&str>,
    ) -> Result<CancelReceipt, GatewayError> {
        self.record(format!("cancel {} {:?}", id, provider))?;
        Ok(CancelReceipt::new("ACCESS_CANCEL"))
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// REST API Tests - Stub Gateway
// ============================================================================

#[tokio::test]
async fn test_info_endpoint() {
    let app = create_router(Arc::new(StubGateway::default()));

    let (status, json) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "name": "SMS Gateway API",
            "version": "test",
            "providers": ["sms-activate", "5sim"],
            "configured_providers": ["5sim"]
        })
    );
}

#[tokio::test]
async fn test_rent_endpoint() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_router(Arc::clone(&gateway));

    let (status, json) = send(
        app,
        post_json("/number", r#"{"service":"tg","country":"0","provider":"sms-activate"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "id": "12345",
            "number": "+79001234567",
            "provider": "sms-activate",
            "service": "tg",
            "cost": 0.0
        })
    );
    assert_eq!(
        gateway.calls(),
        vec![r#"rent tg Some("0") Some("sms-activate")"#.to_string()]
    );
}

#[tokio::test]
async fn test_rent_malformed_json_is_bad_request() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_router(Arc::clone(&gateway));

    let (status, json) = send(app, post_json("/number", r#"{"service": "#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_request");
    assert!(json["detail"].as_str().is_some_and(|d| !d.is_empty()));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_rent_missing_service_is_bad_request() {
    let app = create_router(Arc::new(StubGateway::default()));

    let (status, json) = send(app, post_json("/number", r#"{"country":"0"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_request");
}

#[tokio::test]
async fn test_rent_without_content_type_is_bad_request() {
    let app = create_router(Arc::new(StubGateway::default()));

    let request = Request::builder()
        .method("POST")
        .uri("/number")
        .body(Body::from(r#"{"service":"tg"}"#))
        .unwrap();
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sms_endpoint() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_router(Arc::clone(&gateway));

    let (status, json) = send(app, get("/sms/12345?provider=5sim")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "id": "12345",
            "code": "8842",
            "full_text": "Telegram code 8842",
            "status": "completed"
        })
    );
    assert_eq!(gateway.calls(), vec![r#"poll 12345 Some("5sim")"#.to_string()]);
}

#[tokio::test]
async fn test_sms_endpoint_without_provider() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_router(Arc::clone(&gateway));

    let (status, _) = send(app, get("/sms/12345")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(gateway.calls(), vec!["poll 12345 None".to_string()]);
}

#[tokio::test]
async fn test_balance_endpoint() {
    let app = create_router(Arc::new(StubGateway::default()));

    let (status, json) = send(app, get("/balance")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([{"provider": "5sim", "balance": 12.5}]));
}

#[tokio::test]
async fn test_cancel_endpoint() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_router(Arc::clone(&gateway));

    let request = Request::builder()
        .method("POST")
        .uri("/cancel/12345?provider=sms-activate")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "cancelled", "response": "ACCESS_CANCEL"}));
    assert_eq!(
        gateway.calls(),
        vec![r#"cancel 12345 Some("sms-activate")"#.to_string()]
    );
}

#[tokio::test]
async fn test_invalid_request_maps_to_400() {
    let app = create_router(Arc::new(StubGateway::failing(GatewayError::InvalidRequest(
        "Unknown provider: twilio".to_string(),
    ))));

    let (status, json) = send(app, get("/sms/12345?provider=twilio")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"error": "invalid_request", "detail": "Unknown provider: twilio"})
    );
}

#[tokio::test]
async fn test_internal_error_maps_to_500() {
    let app = create_router(Arc::new(StubGateway::failing(GatewayError::Internal(
        "SMS-Activate error: NO_NUMBERS".to_string(),
    ))));

    let (status, json) = send(app, post_json("/number", r#"{"service":"tg"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["detail"], "SMS-Activate error: NO_NUMBERS");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_router(Arc::new(StubGateway::default()));

    let (status, _) = send(app, get("/numbers")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// End to end - real gateway, mocked sms-activate
// ============================================================================

#[tokio::test]
async fn test_rent_and_poll_through_real_gateway() {
    let sms_activate = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumber"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_NUMBER:12345:79001234567"))
        .mount(&sms_activate)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "getStatus"))
        .and(query_param("id", "12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string("STATUS_OK:8842"))
        .mount(&sms_activate)
        .await;

    let config = GatewayConfig::builder()
        .sms_activate_api_key("sa_key")
        .sms_activate_endpoint(Url::parse(&sms_activate.uri()).unwrap())
        .build()
        .unwrap();
    let gateway = Arc::new(SmsGateway::from_config(&config).unwrap());

    let (status, rental) = send(
        create_router(Arc::clone(&gateway)),
        post_json("/number", r#"{"service":"tg"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rental["id"], "12345");
    assert_eq!(rental["number"], "79001234567");
    assert_eq!(rental["provider"], "sms-activate");

    let (status, report) = send(create_router(Arc::clone(&gateway)), get("/sms/12345")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "completed");
    assert_eq!(report["code"], "8842");

    let (status, error) = send(
        create_router(gateway),
        get("/sms/12345?provider=onlinesim"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["detail"], "Unknown provider: onlinesim");
}
