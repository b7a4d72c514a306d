//! Completed-program tracking: one row per actual run of a program by a
//! user, from start date to optional end date.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::completed::{CompletedProgram, CompletedProgramWithExercises};

use super::completed_exercise_service::attach_details;
use super::ServiceResult;

const PROGRAM_COLUMNS: &str = "id, user_id, program_id, start_date, end_date";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompletedProgram {
    pub program_id: i32,
    /// Defaults to now when absent
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompletedProgram {
    pub program_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    /// Distinguishes absent (keep) from explicit null (back in progress)
    #[serde(default, with = "serde_with::rust::double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

pub struct CompletedProgramService {
    pool: PgPool,
}

impl CompletedProgramService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The caller's completed programs, most recent first, each with its
    /// enriched completed exercises.
    pub async fn list(&self, user_id: i32) -> ServiceResult<Vec<CompletedProgramWithExercises>> {
        let programs = sqlx::query_as::<_, CompletedProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM user_completed_programs
             WHERE user_id = $1
             ORDER BY start_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(programs.len());
        for program in programs {
            result.push(self.with_exercises(program).await?);
        }
        Ok(result)
    }

    pub async fn get_by_id(
        &self,
        id: i32,
        user_id: i32,
    ) -> ServiceResult<Option<CompletedProgramWithExercises>> {
        let program = sqlx::query_as::<_, CompletedProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM user_completed_programs
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match program {
            Some(program) => Ok(Some(self.with_exercises(program).await?)),
            None => Ok(None),
        }
    }

    pub async fn create(
        &self,
        user_id: i32,
        data: CreateCompletedProgram,
    ) -> ServiceResult<CompletedProgramWithExercises> {
        let program = sqlx::query_as::<_, CompletedProgram>(&format!(
            "INSERT INTO user_completed_programs (user_id, program_id, start_date, end_date)
             VALUES ($1, $2, COALESCE($3, now()), $4)
             RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(user_id)
        .bind(data.program_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(CompletedProgramWithExercises {
            program,
            completed_exercises: Vec::new(),
        })
    }

    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        data: UpdateCompletedProgram,
    ) -> ServiceResult<Option<CompletedProgramWithExercises>> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, CompletedProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM user_completed_programs
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let end_date = match data.end_date {
            Some(replacement) => replacement,
            None => existing.end_date,
        };

        let program = sqlx::query_as::<_, CompletedProgram>(&format!(
            "UPDATE user_completed_programs
             SET program_id = $2, start_date = $3, end_date = $4
             WHERE id = $1
             RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(id)
        .bind(data.program_id.unwrap_or(existing.program_id))
        .bind(data.start_date.unwrap_or(existing.start_date))
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(self.with_exercises(program).await?))
    }

    /// Delete the run; its completed exercises cascade via foreign key.
    pub async fn delete(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_completed_programs WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn with_exercises(
        &self,
        program: CompletedProgram,
    ) -> ServiceResult<CompletedProgramWithExercises> {
        let rows = sqlx::query_as::<_, crate::database::models::completed::CompletedExercise>(
            "SELECT id, completed_program_id, program_exercise_id, exercise_id,
                    sets, reps, duration, weight, rest_duration
             FROM user_completed_exercises
             WHERE completed_program_id = $1
             ORDER BY id",
        )
        .bind(program.id)
        .fetch_all(&self.pool)
        .await?;

        let completed_exercises = attach_details(&self.pool, rows).await?;
        Ok(CompletedProgramWithExercises {
            program,
            completed_exercises,
        })
    }
}
