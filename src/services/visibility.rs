//! The single ownership predicate every component authorizes against.
//!
//! A program is visible to a user when they own it or when it is a system
//! program (no owner). Child resources (planned programs, planned dates)
//! resolve their access by following foreign keys up to this check instead
//! of re-deriving the join per call site.

use sqlx::PgExecutor;

/// True when `program_id` exists and is owned by `user_id` or system-owned.
/// Generic over the executor so it runs on the pool or inside a transaction.
pub async fn resolve_program_visibility<'e>(
    executor: impl PgExecutor<'e>,
    program_id: i32,
    user_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM exercise_programs
             WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)
         )",
    )
    .bind(program_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}
