//! User subscription endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::user_subscription_service::{CreateUserSubscription, UpdateUserSubscription};
use crate::services::UserSubscriptionService;
use crate::state::AppState;

/// GET /api/user-subscriptions
pub async fn list_user_subscriptions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let subscriptions = UserSubscriptionService::new(state.pool.clone())
        .get_by_user(user.user_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": subscriptions })))
}

/// GET /api/user-subscriptions/:id
pub async fn get_user_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = UserSubscriptionService::new(state.pool.clone())
        .get_by_id(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscription not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": subscription })))
}

/// POST /api/user-subscriptions
pub async fn create_user_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateUserSubscription>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = UserSubscriptionService::new(state.pool.clone())
        .create(user.user_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": subscription })),
    ))
}

/// PUT /api/user-subscriptions/:id
pub async fn update_user_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserSubscription>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = UserSubscriptionService::new(state.pool.clone())
        .update(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscription not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": subscription })))
}

/// DELETE /api/user-subscriptions/:id
pub async fn delete_user_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = UserSubscriptionService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Subscription not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
