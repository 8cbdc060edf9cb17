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

use fleetboard_duckdb::cars::{CreateCarParams, UpdateCarParams};

use crate::{error::AppError, state::AppState};

/// Uploads are decoded in memory; 5 MB of image is plenty for a listing photo.
pub(crate) const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub sale_price: f64,
    pub shop_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCarRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub sale_price: Option<f64>,
    pub status: Option<String>,
    pub shop_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListCarsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/cars` — Add a vehicle to the inventory.
pub async fn create_car(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCarRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.make.trim().is_empty() {
        return Err(AppError::BadRequest("make is required".to_string()));
    }
    if req.model.trim().is_empty() {
        return Err(AppError::BadRequest("model is required".to_string()));
    }
    if req.sale_price < 0.0 {
        return Err(AppError::BadRequest(
            "sale_price cannot be negative".to_string(),
        ));
    }
    if let Some(shop_id) = &req.shop_id {
        if state
            .db
            .get_shop(shop_id)
            .await
            .map_err(AppError::Internal)?
            .is_none()
        {
            return Err(AppError::BadRequest(format!("unknown shop: {shop_id}")));
        }
    }

    let car = state
        .db
        .create_car(CreateCarParams {
            shop_id: req.shop_id,
            make: req.make.trim().to_string(),
            model: req.model.trim().to_string(),
            year: req.year,
            sale_price: req.sale_price,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": car }))))
}

/// `GET /api/cars` — List the inventory, optionally filtered by status.
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCarsQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(status) = &query.status {
        if status != "available" && status != "sold" {
            return Err(AppError::BadRequest(
                "status must be 'available' or 'sold'".to_string(),
            ));
        }
    }
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let (cars, total) = state
        .db
        .list_cars(query.status.as_deref(), limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": cars,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
        }
    })))
}

/// `GET /api/cars/{id}` — Fetch one vehicle.
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(car_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let car = state.db.get_car(&car_id).await.map_err(AppError::Internal)?;
    match car {
        Some(car) => Ok(Json(json!({ "data": car }))),
        None => Err(AppError::NotFound("Car not found".to_string())),
    }
}

/// `PUT /api/cars/{id}` — Patch a vehicle; only provided fields change.
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    Path(car_id): Path<String>,
    Json(req): Json<UpdateCarRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(status) = &req.status {
        if status != "available" && status != "sold" {
            return Err(AppError::BadRequest(
                "status must be 'available' or 'sold'".to_string(),
            ));
        }
    }

    let result = state
        .db
        .update_car(
            &car_id,
            UpdateCarParams {
                shop_id: req.shop_id,
                make: req.make,
                model: req.model,
                year: req.year,
                sale_price: req.sale_price,
                status: req.status,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    match result {
        Some(car) => Ok(Json(json!({ "data": car }))),
        None => Err(AppError::NotFound("Car not found".to_string())),
    }
}

/// `DELETE /api/cars/{id}` — Remove a vehicle from the inventory.
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    Path(car_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_car(&car_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Car not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UploadImageRequest {
    /// Base64-encoded image bytes.
    pub data: String,
    /// `image/jpeg`, `image/png` or `image/webp`.
    pub content_type: String,
}

pub(crate) fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// `POST /api/cars/{id}/image` — Attach a listing photo.
///
/// The image arrives base64-encoded in the JSON body, lands in object
/// storage, and its public URL is written back onto the car row.
pub async fn upload_car_image(
    State(state): State<Arc<AppState>>,
    Path(car_id): Path<String>,
    Json(req): Json<UploadImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(ext) = extension_for(&req.content_type) else {
        return Err(AppError::BadRequest(
            "content_type must be image/jpeg, image/png or image/webp".to_string(),
        ));
    };

    if state
        .db
        .get_car(&car_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Car not found".to_string()));
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

    let key = format!("cars/{car_id}.{ext}");
    let url = state
        .storage
        .put(&key, &bytes)
        .await
        .map_err(AppError::Internal)?;

    state
        .db
        .set_car_image(&car_id, &url)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "data": { "image_url": url } })))
}
