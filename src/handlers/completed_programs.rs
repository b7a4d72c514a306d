//! Completed program endpoints. Always scoped to the authenticated user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::completed_program_service::{CreateCompletedProgram, UpdateCompletedProgram};
use crate::services::{CompletedExerciseService, CompletedProgramService};
use crate::state::AppState;

/// GET /api/user-completed-programs
pub async fn list_completed_programs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let programs = CompletedProgramService::new(state.pool.clone())
        .list(user.user_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": programs })))
}

/// GET /api/user-completed-programs/:id
pub async fn get_completed_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let program = CompletedProgramService::new(state.pool.clone())
        .get_by_id(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": program })))
}

/// GET /api/user-completed-programs/:id/exercises
pub async fn list_completed_program_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let exercises = CompletedExerciseService::new(state.pool.clone())
        .get_all_by_program(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": exercises })))
}

/// POST /api/user-completed-programs
pub async fn create_completed_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCompletedProgram>,
) -> Result<impl IntoResponse, ApiError> {
    let program = CompletedProgramService::new(state.pool.clone())
        .create(user.user_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": program })),
    ))
}

/// PUT /api/user-completed-programs/:id
pub async fn update_completed_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompletedProgram>,
) -> Result<impl IntoResponse, ApiError> {
    let program = CompletedProgramService::new(state.pool.clone())
        .update(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Completed program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": program })))
}

/// DELETE /api/user-completed-programs/:id
pub async fn delete_completed_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = CompletedProgramService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Completed program not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
