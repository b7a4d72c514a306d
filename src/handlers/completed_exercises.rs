//! Completed exercise endpoints. Ownership is always re-derived through
//! the parent completed program.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::completed_exercise_service::{
    CreateCompletedExercise, UpdateCompletedExercise,
};
use crate::services::CompletedExerciseService;
use crate::state::AppState;

/// GET /api/user-completed-exercises/:id
pub async fn get_completed_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let exercise = CompletedExerciseService::new(state.pool.clone())
        .get_by_id(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed exercise not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": exercise })))
}

/// POST /api/user-completed-exercises
pub async fn create_completed_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCompletedExercise>,
) -> Result<impl IntoResponse, ApiError> {
    let exercise = CompletedExerciseService::new(state.pool.clone())
        .create(user.user_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": exercise })),
    ))
}

/// PUT /api/user-completed-exercises/:id
pub async fn update_completed_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompletedExercise>,
) -> Result<impl IntoResponse, ApiError> {
    let exercise = CompletedExerciseService::new(state.pool.clone())
        .update(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed exercise not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": exercise })))
}

/// DELETE /api/user-completed-exercises/:id
pub async fn delete_completed_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = CompletedExerciseService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Completed exercise not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
