use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    pub limit: Option<i64>,
}

/// `GET /api/explore` — The public browse catalog: featured available
/// cars with branch names, the branch list, and a per-kind census of
/// active service providers.
pub async fn explore(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExploreQuery>,
) -> Result<impl IntoResponse, AppError> {
    let featured_limit = query.limit.unwrap_or(12).clamp(1, 50);

    let overview = state
        .db
        .explore_overview(featured_limit)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "data": overview })))
}
