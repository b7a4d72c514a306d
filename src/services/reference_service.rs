//! Read-only lookups for the reference tables. These are trivial by design:
//! the interesting validation happens where the ids are consumed.

use sqlx::PgPool;

use crate::database::models::reference::{
    DifficultyLevel, ExerciseCategory, FitnessGoal, MuscleGroup, Subscription,
};

use super::ServiceResult;

pub struct ReferenceService {
    pool: PgPool,
}

impl ReferenceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn difficulty_levels(&self) -> ServiceResult<Vec<DifficultyLevel>> {
        let rows = sqlx::query_as::<_, DifficultyLevel>(
            "SELECT id, name FROM difficulty_levels ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn difficulty_level(&self, id: i32) -> ServiceResult<Option<DifficultyLevel>> {
        let row = sqlx::query_as::<_, DifficultyLevel>(
            "SELECT id, name FROM difficulty_levels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn muscle_groups(&self) -> ServiceResult<Vec<MuscleGroup>> {
        let rows =
            sqlx::query_as::<_, MuscleGroup>("SELECT id, name FROM muscle_groups ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn muscle_group(&self, id: i32) -> ServiceResult<Option<MuscleGroup>> {
        let row = sqlx::query_as::<_, MuscleGroup>("SELECT id, name FROM muscle_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn fitness_goals(&self) -> ServiceResult<Vec<FitnessGoal>> {
        let rows =
            sqlx::query_as::<_, FitnessGoal>("SELECT id, name FROM fitness_goals ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn fitness_goal(&self, id: i32) -> ServiceResult<Option<FitnessGoal>> {
        let row = sqlx::query_as::<_, FitnessGoal>("SELECT id, name FROM fitness_goals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn exercise_categories(&self) -> ServiceResult<Vec<ExerciseCategory>> {
        let rows = sqlx::query_as::<_, ExerciseCategory>(
            "SELECT id, name FROM exercise_categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn exercise_category(&self, id: i32) -> ServiceResult<Option<ExerciseCategory>> {
        let row = sqlx::query_as::<_, ExerciseCategory>(
            "SELECT id, name FROM exercise_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn subscriptions(&self) -> ServiceResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, Subscription>(
            "SELECT id, name, description FROM subscriptions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn subscription(&self, id: i32) -> ServiceResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, Subscription>(
            "SELECT id, name, description FROM subscriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
