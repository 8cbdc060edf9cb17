use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use fleetboard_duckdb::shops::{CreateShopParams, UpdateShopParams};

use crate::{error::AppError, state::AppState};

use super::cars::{extension_for, UploadImageRequest, MAX_IMAGE_BYTES};

#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListShopsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/shops` — Open a new branch.
pub async fn create_shop(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShopRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let shop = state
        .db
        .create_shop(CreateShopParams {
            name: req.name.trim().to_string(),
            city: req.city,
            address: req.address,
            phone: req.phone,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": shop }))))
}

/// `GET /api/shops` — List branches.
pub async fn list_shops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListShopsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (shops, total) = state
        .db
        .list_shops(limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": shops,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}

/// `GET /api/shops/{id}` — Fetch one branch.
pub async fn get_shop(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let shop = state
        .db
        .get_shop(&shop_id)
        .await
        .map_err(AppError::Internal)?;
    match shop {
        Some(shop) => Ok(Json(json!({ "data": shop }))),
        None => Err(AppError::NotFound("Shop not found".to_string())),
    }
}

/// `PUT /api/shops/{id}` — Patch a branch.
pub async fn update_shop(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<String>,
    Json(req): Json<UpdateShopRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = state
        .db
        .update_shop(
            &shop_id,
            UpdateShopParams {
                name: req.name,
                city: req.city,
                address: req.address,
                phone: req.phone,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    match result {
        Some(shop) => Ok(Json(json!({ "data": shop }))),
        None => Err(AppError::NotFound("Shop not found".to_string())),
    }
}

/// `DELETE /api/shops/{id}` — Close a branch.
///
/// Its cars stay in the inventory with no branch attached.
pub async fn delete_shop(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_shop(&shop_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Shop not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/shops/{id}/image` — Attach a storefront photo.
///
/// Same base64-JSON contract as the car image upload.
pub async fn upload_shop_image(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<String>,
    Json(req): Json<UploadImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(ext) = extension_for(&req.content_type) else {
        return Err(AppError::BadRequest(
            "content_type must be image/jpeg, image/png or image/webp".to_string(),
        ));
    };

    if state
        .db
        .get_shop(&shop_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Shop not found".to_string()));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(req.data.as_bytes())
        .map_err(|_| AppError::BadRequest("data is not valid base64".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("image is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::PayloadTooLarge);
    }

    let key = format!("shops/{shop_id}.{ext}");
    let url = state
        .storage
        .put(&key, &bytes)
        .await
        .map_err(AppError::Internal)?;

    state
        .db
        .set_shop_image(&shop_id, &url)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "data": { "image_url": url } })))
}
