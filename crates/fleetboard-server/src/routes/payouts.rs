use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use fleetboard_duckdb::payouts::CreatePayoutParams;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreatePayoutRequest {
    pub provider_id: String,
    pub amount: f64,
    pub method: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPayoutsQuery {
    pub provider_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/payouts` — Record a payment to a provider.
pub async fn create_payout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePayoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.amount <= 0.0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }
    if state
        .db
        .get_provider(&req.provider_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "unknown provider: {}",
            req.provider_id
        )));
    }

    let payout = state
        .db
        .create_payout(CreatePayoutParams {
            provider_id: req.provider_id,
            amount: req.amount,
            method: req.method,
            reference: req.reference,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": payout }))))
}

/// `GET /api/payouts` — List payouts, optionally for one provider.
pub async fn list_payouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPayoutsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (payouts, total) = state
        .db
        .list_payouts(query.provider_id.as_deref(), limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": payouts,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}
