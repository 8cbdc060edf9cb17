use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use fleetboard_duckdb::deals::{CreateDealParams, DealStatus, DealStatusChange, UpdateDealParams};

use crate::{error::AppError, state::AppState};

/// Reject a malformed trip date before it reaches the `DATE` column.
fn validate_trip_date(raw: Option<&str>) -> Result<(), AppError> {
    let Some(raw) = raw else {
        return Ok(());
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            AppError::BadRequest(format!("trip_date must be YYYY-MM-DD, got '{raw}'"))
        })
}

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    /// "sale" or "trip".
    pub kind: String,
    pub customer_id: String,
    pub amount: f64,
    pub car_id: Option<String>,
    pub provider_id: Option<String>,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDealRequest {
    pub amount: Option<f64>,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListDealsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/deals` — Open a deal in `pending`.
///
/// Sale deals reference a car; trip deals carry destination, date and
/// seats and may reference a service provider.
pub async fn create_deal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDealRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.amount < 0.0 {
        return Err(AppError::BadRequest("amount cannot be negative".to_string()));
    }
    validate_trip_date(req.trip_date.as_deref())?;

    match req.kind.as_str() {
        "sale" => {
            let Some(car_id) = &req.car_id else {
                return Err(AppError::BadRequest(
                    "sale deals require car_id".to_string(),
                ));
            };
            let car = state
                .db
                .get_car(car_id)
                .await
                .map_err(AppError::Internal)?
                .ok_or_else(|| AppError::BadRequest(format!("unknown car: {car_id}")))?;
            if car.status != "available" {
                return Err(AppError::Conflict(format!(
                    "car {car_id} is not available"
                )));
            }
        }
        "trip" => {
            if req.destination.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::BadRequest(
                    "trip deals require destination".to_string(),
                ));
            }
            if let Some(seats) = req.seats {
                if seats <= 0 {
                    return Err(AppError::BadRequest("seats must be positive".to_string()));
                }
            }
            if let Some(provider_id) = &req.provider_id {
                if state
                    .db
                    .get_provider(provider_id)
                    .await
                    .map_err(AppError::Internal)?
                    .is_none()
                {
                    return Err(AppError::BadRequest(format!(
                        "unknown provider: {provider_id}"
                    )));
                }
            }
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "kind must be 'sale' or 'trip', got '{other}'"
            )))
        }
    }

    if state
        .db
        .get_customer(&req.customer_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "unknown customer: {}",
            req.customer_id
        )));
    }

    let deal = state
        .db
        .create_deal(CreateDealParams {
            kind: req.kind,
            car_id: req.car_id,
            customer_id: req.customer_id,
            provider_id: req.provider_id,
            amount: req.amount,
            destination: req.destination,
            trip_date: req.trip_date,
            seats: req.seats,
            notes: req.notes,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": deal }))))
}

/// `GET /api/deals` — List deals, optionally filtered by status.
pub async fn list_deals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDealsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query
        .status
        .as_deref()
        .map(DealStatus::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (deals, total) = state
        .db
        .list_deals(status, limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": deals,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}

/// `GET /api/deals/{id}` — Fetch one deal.
pub async fn get_deal(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deal = state
        .db
        .get_deal(&deal_id)
        .await
        .map_err(AppError::Internal)?;
    match deal {
        Some(deal) => Ok(Json(json!({ "data": deal }))),
        None => Err(AppError::NotFound("Deal not found".to_string())),
    }
}

/// `PUT /api/deals/{id}` — Patch deal details (not its status).
pub async fn update_deal(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
    Json(req): Json<UpdateDealRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(amount) = req.amount {
        if amount < 0.0 {
            return Err(AppError::BadRequest("amount cannot be negative".to_string()));
        }
    }
    validate_trip_date(req.trip_date.as_deref())?;

    let result = state
        .db
        .update_deal(
            &deal_id,
            UpdateDealParams {
                amount: req.amount,
                destination: req.destination,
                trip_date: req.trip_date,
                seats: req.seats,
                notes: req.notes,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    match result {
        Some(deal) => Ok(Json(json!({ "data": deal }))),
        None => Err(AppError::NotFound("Deal not found".to_string())),
    }
}

/// `POST /api/deals/{id}/status` — Complete or cancel a pending deal.
///
/// Completing a sale deal marks its car sold in the same transaction.
pub async fn set_deal_status(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let next =
        DealStatus::parse(&req.status).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if next == DealStatus::Pending {
        return Err(AppError::BadRequest(
            "cannot transition back to pending".to_string(),
        ));
    }

    let result = state
        .db
        .set_deal_status(&deal_id, next)
        .await
        .map_err(AppError::Internal)?;

    match result {
        DealStatusChange::Updated(deal) => Ok(Json(json!({ "data": deal }))),
        DealStatusChange::NotFound => Err(AppError::NotFound("Deal not found".to_string())),
        DealStatusChange::NotPending { current } => Err(AppError::Conflict(format!(
            "deal is already {current}; only pending deals can change status"
        ))),
    }
}

/// `DELETE /api/deals/{id}` — Remove a deal.
pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_deal(&deal_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Deal not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
