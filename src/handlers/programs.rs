//! Exercise program endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::program_service::{
    CreateExerciseProgram, ProgramFilter, UpdateExerciseProgram,
};
use crate::services::ProgramService;
use crate::state::AppState;

/// GET /api/exercise-programs - own programs plus the system catalog
pub async fn list_programs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<ProgramFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let programs = ProgramService::new(state.pool.clone())
        .list(user.user_id, &filter)
        .await?;
    Ok(Json(json!({ "success": true, "data": programs })))
}

/// GET /api/exercise-programs/:id
pub async fn get_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let program = ProgramService::new(state.pool.clone())
        .get_by_id(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": program })))
}

/// POST /api/exercise-programs
pub async fn create_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateExerciseProgram>,
) -> Result<impl IntoResponse, ApiError> {
    // A null owner creates a shared system program; a non-null owner must
    // be the caller.
    if let Some(owner) = payload.user_id {
        if owner != user.user_id {
            return Err(ApiError::forbidden(
                "Cannot create a program on behalf of another user",
            ));
        }
    }

    let program = ProgramService::new(state.pool.clone()).create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": program })),
    ))
}

/// PUT /api/exercise-programs/:id
pub async fn update_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateExerciseProgram>,
) -> Result<impl IntoResponse, ApiError> {
    let program = ProgramService::new(state.pool.clone())
        .update(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": program })))
}

/// DELETE /api/exercise-programs/:id
pub async fn delete_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = ProgramService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Exercise program not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
