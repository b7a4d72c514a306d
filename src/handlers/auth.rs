//! Token issuance boundary. The core services never see credentials, only
//! the user id carried in the claims.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, Claims};
use crate::database::models::user::User;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register - create a user and return a bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::validation_error("A valid email is required"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::validation_error(
            "Password must be at least 8 characters",
        ));
    }

    let taken = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(&req.email)
        .fetch_one(&state.pool)
        .await?;
    if taken {
        return Err(ApiError::conflict("Email already registered"));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash)
         VALUES ($1, $2)
         RETURNING id, email, password_hash",
    )
    .bind(&req.email)
    .bind(auth::hash_password(&req.password))
    .fetch_one(&state.pool)
    .await?;

    let token = auth::generate_token(&Claims::new(user.id, user.email.clone()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "token": token, "user": user } })),
    ))
}

/// POST /auth/login - verify credentials and return a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash FROM users WHERE email = $1",
    )
    .bind(&req.email)
    .fetch_optional(&state.pool)
    .await?;

    // One message for both unknown email and wrong password
    let Some(user) = user else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };
    if user.password_hash != auth::hash_password(&req.password) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::generate_token(&Claims::new(user.id, user.email.clone()))?;

    Ok(Json(
        json!({ "success": true, "data": { "token": token, "user": user } }),
    ))
}
