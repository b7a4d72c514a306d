//! Router assembly. Everything under /api requires a bearer token; the
//! handlers receive the authenticated user id from the middleware.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database;
use crate::handlers;
use crate::middleware::auth::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(reference_routes())
        .merge(exercise_routes())
        .merge(program_routes())
        .merge(planned_program_routes())
        .merge(completion_routes())
        .merge(user_subscription_routes())
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn reference_routes() -> Router<AppState> {
    use handlers::reference;

    Router::new()
        .route("/api/difficulty-levels", get(reference::list_difficulty_levels))
        .route("/api/difficulty-levels/:id", get(reference::get_difficulty_level))
        .route("/api/muscle-groups", get(reference::list_muscle_groups))
        .route("/api/muscle-groups/:id", get(reference::get_muscle_group))
        .route("/api/fitness-goals", get(reference::list_fitness_goals))
        .route("/api/fitness-goals/:id", get(reference::get_fitness_goal))
        .route("/api/exercise-categories", get(reference::list_exercise_categories))
        .route("/api/exercise-categories/:id", get(reference::get_exercise_category))
        .route("/api/subscriptions", get(reference::list_subscriptions))
        .route("/api/subscriptions/:id", get(reference::get_subscription))
}

fn exercise_routes() -> Router<AppState> {
    use handlers::exercises;

    Router::new()
        .route("/api/exercises", get(exercises::list_exercises))
        .route("/api/exercises/:id", get(exercises::get_exercise))
}

fn program_routes() -> Router<AppState> {
    use handlers::programs;

    Router::new()
        .route(
            "/api/exercise-programs",
            get(programs::list_programs).post(programs::create_program),
        )
        .route(
            "/api/exercise-programs/:id",
            get(programs::get_program)
                .put(programs::update_program)
                .delete(programs::delete_program),
        )
}

fn planned_program_routes() -> Router<AppState> {
    use handlers::planned_programs as planned;

    Router::new()
        .route(
            "/api/planned-exercise-programs",
            get(planned::list_planned_programs).post(planned::create_planned_program),
        )
        // Static "dates" segment takes priority over the :id below
        .route(
            "/api/planned-exercise-programs/dates/:id",
            axum::routing::put(planned::update_planned_date)
                .delete(planned::delete_planned_date),
        )
        .route(
            "/api/planned-exercise-programs/:id",
            get(planned::get_planned_program)
                .put(planned::update_planned_program)
                .delete(planned::delete_planned_program),
        )
        .route(
            "/api/planned-exercise-programs/:id/dates",
            post(planned::create_planned_date),
        )
}

fn completion_routes() -> Router<AppState> {
    use handlers::{completed_exercises, completed_programs};

    Router::new()
        .route(
            "/api/user-completed-programs",
            get(completed_programs::list_completed_programs)
                .post(completed_programs::create_completed_program),
        )
        .route(
            "/api/user-completed-programs/:id",
            get(completed_programs::get_completed_program)
                .put(completed_programs::update_completed_program)
                .delete(completed_programs::delete_completed_program),
        )
        .route(
            "/api/user-completed-programs/:id/exercises",
            get(completed_programs::list_completed_program_exercises),
        )
        .route(
            "/api/user-completed-exercises",
            post(completed_exercises::create_completed_exercise),
        )
        .route(
            "/api/user-completed-exercises/:id",
            get(completed_exercises::get_completed_exercise)
                .put(completed_exercises::update_completed_exercise)
                .delete(completed_exercises::delete_completed_exercise),
        )
}

fn user_subscription_routes() -> Router<AppState> {
    use handlers::user_subscriptions as subs;

    Router::new()
        .route(
            "/api/user-subscriptions",
            get(subs::list_user_subscriptions).post(subs::create_user_subscription),
        )
        .route(
            "/api/user-subscriptions/:id",
            get(subs::get_user_subscription)
                .put(subs::update_user_subscription)
                .delete(subs::delete_user_subscription),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Fittrack API",
            "version": version,
            "description": "Fitness tracking backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "reference": "/api/difficulty-levels, /api/muscle-groups, /api/fitness-goals, /api/exercise-categories, /api/subscriptions (protected)",
                "exercises": "/api/exercises[/:id] (protected)",
                "programs": "/api/exercise-programs[/:id] (protected)",
                "planned": "/api/planned-exercise-programs[/:id], /api/planned-exercise-programs/:id/dates (protected)",
                "completed": "/api/user-completed-programs[/:id], /api/user-completed-exercises[/:id] (protected)",
                "subscriptions": "/api/user-subscriptions[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::pool::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
