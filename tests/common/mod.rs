#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use sqlx::PgPool;
use tokio::sync::OnceCell;

use fittrack_api_rust::database;

static POOL: OnceCell<Option<PgPool>> = OnceCell::const_new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Pool against the database named by DATABASE_URL, with the schema
/// applied. Returns None (and the caller skips) when no database is
/// configured, so the suite stays green on machines without Postgres.
pub async fn test_pool() -> Option<PgPool> {
    POOL.get_or_init(|| async {
        let _ = dotenvy::dotenv();
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = database::pool::connect_to(&url)
            .await
            .expect("failed to connect to test database");
        database::apply_schema(&pool)
            .await
            .expect("failed to apply schema");
        Some(pool)
    })
    .await
    .clone()
}

fn unique_suffix() -> String {
    format!(
        "{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

pub async fn create_user(pool: &PgPool) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (email, password_hash) VALUES ($1, 'test-hash') RETURNING id",
    )
    .bind(format!("user-{}@test.example", unique_suffix()))
    .fetch_one(pool)
    .await
    .expect("failed to create user")
}

pub async fn create_difficulty_level(pool: &PgPool) -> i32 {
    sqlx::query_scalar::<_, i32>("INSERT INTO difficulty_levels (name) VALUES ($1) RETURNING id")
        .bind(format!("difficulty-{}", unique_suffix()))
        .fetch_one(pool)
        .await
        .expect("failed to create difficulty level")
}

pub async fn create_fitness_goal(pool: &PgPool) -> i32 {
    sqlx::query_scalar::<_, i32>("INSERT INTO fitness_goals (name) VALUES ($1) RETURNING id")
        .bind(format!("goal-{}", unique_suffix()))
        .fetch_one(pool)
        .await
        .expect("failed to create fitness goal")
}

pub async fn create_exercise(pool: &PgPool) -> i32 {
    sqlx::query_scalar::<_, i32>("INSERT INTO exercises (name) VALUES ($1) RETURNING id")
        .bind(format!("exercise-{}", unique_suffix()))
        .fetch_one(pool)
        .await
        .expect("failed to create exercise")
}

pub async fn create_subscription_plan(pool: &PgPool) -> i32 {
    sqlx::query_scalar::<_, i32>("INSERT INTO subscriptions (name) VALUES ($1) RETURNING id")
        .bind(format!("plan-{}", unique_suffix()))
        .fetch_one(pool)
        .await
        .expect("failed to create subscription plan")
}
