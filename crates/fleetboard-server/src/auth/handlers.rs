use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::AppState};

use fleetboard_duckdb::users::CreateUserParams;

use super::jwt::encode_jwt;
use super::middleware::AuthContext;
use super::password::{hash_password, validate_password_strength, verify_password};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// `POST /api/auth/signup` — Create an operator account and log it in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }
    if req.display_name.trim().is_empty() {
        return Err(AppError::BadRequest("display_name is required".to_string()));
    }
    validate_password_strength(&req.password).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.db.email_taken(&email).await.map_err(AppError::Internal)? {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let hash =
        hash_password(&req.password, state.config.argon2_memory_kb).map_err(AppError::Internal)?;

    let user = state
        .db
        .create_user(CreateUserParams {
            email,
            password_hash: hash,
            display_name: req.display_name.trim().to_string(),
        })
        .await
        .map_err(AppError::Internal)?;

    let jwt_secret = state.db.ensure_jwt_secret().await.map_err(AppError::Internal)?;
    let (token, expires_at) =
        encode_jwt(&jwt_secret, &user.id, state.config.session_days).map_err(AppError::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "token": token,
                "expires_at": expires_at,
                "user": user,
            }
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — Exchange credentials for a bearer JWT.
///
/// The same 401 comes back for an unknown email and a wrong password, so
/// the endpoint cannot be used to probe which accounts exist.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(AppError::Internal)?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let jwt_secret = state.db.ensure_jwt_secret().await.map_err(AppError::Internal)?;
    let (token, expires_at) =
        encode_jwt(&jwt_secret, &user.id, state.config.session_days).map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": {
            "token": token,
            "expires_at": expires_at,
            "user": user,
        }
    })))
}

/// `GET /api/auth/me` — The account behind the presented token.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .get_user(&ctx.user_id)
        .await
        .map_err(AppError::Internal)?;

    match user {
        Some(user) => Ok(Json(json!({ "data": user }))),
        None => Err(AppError::Unauthorized),
    }
}
