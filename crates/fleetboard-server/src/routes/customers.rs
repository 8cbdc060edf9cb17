use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use fleetboard_duckdb::customers::CreateCustomerParams;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/customers` — Register a customer.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let customer = state
        .db
        .create_customer(CreateCustomerParams {
            name: req.name.trim().to_string(),
            phone: req.phone,
            email: req.email,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": customer }))))
}

/// `GET /api/customers` — List customers.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (customers, total) = state
        .db
        .list_customers(limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": customers,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}

/// `GET /api/customers/{id}` — Fetch one customer.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state
        .db
        .get_customer(&customer_id)
        .await
        .map_err(AppError::Internal)?;
    match customer {
        Some(customer) => Ok(Json(json!({ "data": customer }))),
        None => Err(AppError::NotFound("Customer not found".to_string())),
    }
}
