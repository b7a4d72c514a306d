//! Read-only reference data endpoints.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::services::ReferenceService;
use crate::state::AppState;

/// GET /api/difficulty-levels
pub async fn list_difficulty_levels(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = ReferenceService::new(state.pool.clone()).difficulty_levels().await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}

/// GET /api/difficulty-levels/:id
pub async fn get_difficulty_level(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = ReferenceService::new(state.pool.clone())
        .difficulty_level(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Difficulty level not found"))?;
    Ok(Json(json!({ "success": true, "data": row })))
}

/// GET /api/muscle-groups
pub async fn list_muscle_groups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = ReferenceService::new(state.pool.clone()).muscle_groups().await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}

/// GET /api/muscle-groups/:id
pub async fn get_muscle_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = ReferenceService::new(state.pool.clone())
        .muscle_group(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Muscle group not found"))?;
    Ok(Json(json!({ "success": true, "data": row })))
}

/// GET /api/fitness-goals
pub async fn list_fitness_goals(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = ReferenceService::new(state.pool.clone()).fitness_goals().await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}

/// GET /api/fitness-goals/:id
pub async fn get_fitness_goal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = ReferenceService::new(state.pool.clone())
        .fitness_goal(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Fitness goal not found"))?;
    Ok(Json(json!({ "success": true, "data": row })))
}

/// GET /api/exercise-categories
pub async fn list_exercise_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = ReferenceService::new(state.pool.clone()).exercise_categories().await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}

/// GET /api/exercise-categories/:id
pub async fn get_exercise_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = ReferenceService::new(state.pool.clone())
        .exercise_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise category not found"))?;
    Ok(Json(json!({ "success": true, "data": row })))
}

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = ReferenceService::new(state.pool.clone()).subscriptions().await?;
    Ok(Json(json!({ "success": true, "data": rows })))
}

/// GET /api/subscriptions/:id
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = ReferenceService::new(state.pool.clone())
        .subscription(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscription not found"))?;
    Ok(Json(json!({ "success": true, "data": row })))
}
