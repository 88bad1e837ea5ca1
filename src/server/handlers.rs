use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::service::SmsGatewayTrait;
use crate::types::{
    Balance, CancelReceipt, GatewayInfo, RentRequest, Rental, RentalId, SmsReport,
};

/// Optional `?provider=` selector.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderQuery {
    pub provider: Option<String>,
}

/// GET /
pub async fn info<G: SmsGatewayTrait>(State(gateway): State<Arc<G>>) -> Json<GatewayInfo> {
    Json(gateway.info())
}

/// POST /number
pub async fn rent_number<G: SmsGatewayTrait>(
    State(gateway): State<Arc<G>>,
    payload: Result<Json<RentRequest>, JsonRejection>,
) -> Result<Json<Rental>, ApiError> {
    let Json(request) = payload?;
    let rental = gateway.rent_number(request).await?;
    Ok(Json(rental))
}

/// GET /sms/{id}
pub async fn sms_status<G: SmsGatewayTrait>(
    State(gateway): State<Arc<G>>,
    Path(id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<SmsReport>, ApiError> {
    let id = RentalId::from(id);
    let result = gateway
        .poll_status(&id, query.provider.as_deref())
        .await?;
    Ok(Json(SmsReport::new(id, result)))
}

/// GET /balance
pub async fn balances<G: SmsGatewayTrait>(State(gateway): State<Arc<G>>) -> Json<Vec<Balance>> {
    Json(gateway.balances().await)
}

/// POST /cancel/{id}
pub async fn cancel<G: SmsGatewayTrait>(
    State(gateway): State<Arc<G>>,
    Path(id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<CancelReceipt>, ApiError> {
    let receipt = gateway
        .cancel(&RentalId::from(id), query.provider.as_deref())
        .await?;
    Ok(Json(receipt))
}
