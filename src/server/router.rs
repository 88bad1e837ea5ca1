use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::service::SmsGatewayTrait;

/// Create the REST API router
pub fn create_router<G: SmsGatewayTrait + 'static>(gateway: Arc<G>) -> Router {
    Router::new()
        .route("/", get(handlers::info::<G>))
        .route("/number", post(handlers::rent_number::<G>))
        .route("/sms/{id}", get(handlers::sms_status::<G>))
        .route("/balance", get(handlers::balances::<G>))
        .route("/cancel/{id}", post(handlers::cancel::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}
