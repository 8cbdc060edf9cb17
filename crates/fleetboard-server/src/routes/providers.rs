use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use fleetboard_duckdb::providers::{CreateProviderParams, ProviderKind, UpdateProviderParams};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateProviderRequest {
    pub name: String,
    pub kind: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListProvidersQuery {
    pub kind: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/providers` — Register a trip service provider.
pub async fn create_provider(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let kind = ProviderKind::parse(&req.kind).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let provider = state
        .db
        .create_provider(CreateProviderParams {
            name: req.name.trim().to_string(),
            kind,
            phone: req.phone,
            email: req.email,
            city: req.city,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": provider }))))
}

/// `GET /api/providers` — List providers, optionally filtered by kind.
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProvidersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = query
        .kind
        .as_deref()
        .map(ProviderKind::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (providers, total) = state
        .db
        .list_providers(kind, limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": providers,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}

/// `GET /api/providers/{id}` — Fetch one provider.
pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state
        .db
        .get_provider(&provider_id)
        .await
        .map_err(AppError::Internal)?;
    match provider {
        Some(provider) => Ok(Json(json!({ "data": provider }))),
        None => Err(AppError::NotFound("Provider not found".to_string())),
    }
}

/// `PUT /api/providers/{id}` — Patch a provider.
pub async fn update_provider(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Json(req): Json<UpdateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind = req
        .kind
        .as_deref()
        .map(ProviderKind::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = state
        .db
        .update_provider(
            &provider_id,
            UpdateProviderParams {
                name: req.name,
                kind,
                phone: req.phone,
                email: req.email,
                city: req.city,
                active: req.active,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    match result {
        Some(provider) => Ok(Json(json!({ "data": provider }))),
        None => Err(AppError::NotFound("Provider not found".to_string())),
    }
}

/// `DELETE /api/providers/{id}` — Remove a provider and its payout history.
pub async fn delete_provider(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_provider(&provider_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Provider not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/providers/{id}/balance` — Earned vs. paid position.
pub async fn provider_balance(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state
        .db
        .get_provider(&provider_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Provider not found".to_string()));
    }

    let balance = state
        .db
        .provider_balance(&provider_id)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "data": balance })))
}
