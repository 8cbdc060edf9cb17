use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;

use super::jwt::decode_jwt;

/// Auth context injected into request extensions after successful auth.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

/// Require a `Authorization: Bearer <jwt>` header on every request.
///
/// Only layered onto the API router in `local` auth mode; in `none` mode
/// the router is built without this middleware and everything is open.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return unauthorized_response();
    };

    let jwt_secret = match state.db.get_setting("jwt_secret").await {
        Ok(Some(secret)) => secret,
        Ok(None) => return unauthorized_response(),
        Err(e) => {
            tracing::error!(error = %e, "JWT secret lookup failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Ok(claims) = decode_jwt(&token, &jwt_secret) else {
        return unauthorized_response();
    };

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });
    next.run(request).await
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": {
                "code": "unauthorized",
                "message": "Not authenticated",
                "field": null
            }
        })),
    )
        .into_response()
}
