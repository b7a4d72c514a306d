//! Planned exercise program endpoints, including the nested date
//! sub-resource.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::planned_program_service::{
    CreatePlannedDate, CreatePlannedProgram, UpdatePlannedDate, UpdatePlannedProgram,
};
use crate::services::PlannedProgramService;
use crate::state::AppState;

/// GET /api/planned-exercise-programs
pub async fn list_planned_programs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let planned = PlannedProgramService::new(state.pool.clone())
        .list(user.user_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": planned })))
}

/// GET /api/planned-exercise-programs/:id
pub async fn get_planned_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let planned = PlannedProgramService::new(state.pool.clone())
        .get_by_id(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Planned program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": planned })))
}

/// POST /api/planned-exercise-programs
pub async fn create_planned_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePlannedProgram>,
) -> Result<impl IntoResponse, ApiError> {
    let planned = PlannedProgramService::new(state.pool.clone())
        .create(payload, user.user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": planned })),
    ))
}

/// PUT /api/planned-exercise-programs/:id
pub async fn update_planned_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePlannedProgram>,
) -> Result<impl IntoResponse, ApiError> {
    let planned = PlannedProgramService::new(state.pool.clone())
        .update(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Planned program not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": planned })))
}

/// DELETE /api/planned-exercise-programs/:id
pub async fn delete_planned_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = PlannedProgramService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Planned program not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}

/// POST /api/planned-exercise-programs/:id/dates
pub async fn create_planned_date(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(planned_program_id): Path<i32>,
    Json(payload): Json<CreatePlannedDate>,
) -> Result<impl IntoResponse, ApiError> {
    // The payload names its parent too; path and payload must agree
    if payload.planned_program_id != planned_program_id {
        return Err(ApiError::bad_request("Program ID mismatch"));
    }

    let date = PlannedProgramService::new(state.pool.clone())
        .create_date(payload, user.user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": date })),
    ))
}

/// PUT /api/planned-exercise-programs/dates/:id
pub async fn update_planned_date(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePlannedDate>,
) -> Result<impl IntoResponse, ApiError> {
    let date = PlannedProgramService::new(state.pool.clone())
        .update_date(id, user.user_id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Planned date not found or access denied"))?;
    Ok(Json(json!({ "success": true, "data": date })))
}

/// DELETE /api/planned-exercise-programs/dates/:id
pub async fn delete_planned_date(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = PlannedProgramService::new(state.pool.clone())
        .delete_date(id, user.user_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Planned date not found or access denied",
        ));
    }
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
