//! Exercise catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::services::exercise_service::ExerciseFilter;
use crate::services::ExerciseService;
use crate::state::AppState;

/// GET /api/exercises - list with optional comma-list filters
pub async fn list_exercises(
    State(state): State<AppState>,
    Query(filter): Query<ExerciseFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let exercises = ExerciseService::new(state.pool.clone()).get_all(&filter).await?;
    Ok(Json(json!({ "success": true, "data": exercises })))
}

/// GET /api/exercises/:id
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let exercise = ExerciseService::new(state.pool.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    Ok(Json(json!({ "success": true, "data": exercise })))
}
