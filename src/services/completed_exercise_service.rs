//! Completed-exercise tracking: the individual sets a user actually
//! performed inside one completed program run. Strictly user-owned;
//! ownership is re-derived through the parent completed program on every
//! operation.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::completed::{CompletedExercise, CompletedExerciseWithDetails};
use crate::database::models::exercise::Exercise;
use crate::database::models::program::ProgramExercise;

use super::{ServiceError, ServiceResult};

const COMPLETED_COLUMNS: &str = "id, completed_program_id, program_exercise_id, exercise_id, \
                                 sets, reps, duration, weight, rest_duration";
const EXERCISE_COLUMNS: &str =
    "id, name, description, category_id, muscle_group_id, difficulty_level_id";
const PRESCRIPTION_COLUMNS: &str =
    "id, program_id, exercise_id, sort_order, sets, reps, duration, rest_duration";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompletedExercise {
    pub completed_program_id: i32,
    pub program_exercise_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
    pub weight: Option<f64>,
    pub rest_duration: Option<i32>,
}

impl CreateCompletedExercise {
    fn validate(&self) -> ServiceResult<()> {
        if self.program_exercise_id.is_none() && self.exercise_id.is_none() {
            return Err(ServiceError::Validation(
                "A completed exercise must reference a program exercise or a catalog exercise"
                    .to_string(),
            ));
        }
        if self.reps.is_none() && self.duration.is_none() {
            return Err(ServiceError::Validation(
                "A completed exercise requires reps or a duration".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompletedExercise {
    pub program_exercise_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
    pub weight: Option<f64>,
    pub rest_duration: Option<i32>,
}

pub struct CompletedExerciseService {
    pool: PgPool,
}

impl CompletedExerciseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All completed exercises of one completed program, enriched. None
    /// when the parent program is absent or owned by someone else.
    pub async fn get_all_by_program(
        &self,
        completed_program_id: i32,
        user_id: i32,
    ) -> ServiceResult<Option<Vec<CompletedExerciseWithDetails>>> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM user_completed_programs WHERE id = $1 AND user_id = $2
             )",
        )
        .bind(completed_program_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        if !owned {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, CompletedExercise>(&format!(
            "SELECT {COMPLETED_COLUMNS} FROM user_completed_exercises
             WHERE completed_program_id = $1
             ORDER BY id"
        ))
        .bind(completed_program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(attach_details(&self.pool, rows).await?))
    }

    pub async fn get_by_id(
        &self,
        id: i32,
        user_id: i32,
    ) -> ServiceResult<Option<CompletedExerciseWithDetails>> {
        let row = sqlx::query_as::<_, CompletedExercise>(
            "SELECT ce.id, ce.completed_program_id, ce.program_exercise_id, ce.exercise_id,
                    ce.sets, ce.reps, ce.duration, ce.weight, ce.rest_duration
             FROM user_completed_exercises ce
             JOIN user_completed_programs cp ON cp.id = ce.completed_program_id
             WHERE ce.id = $1 AND cp.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut detailed = attach_details(&self.pool, vec![row]).await?;
                Ok(detailed.pop())
            }
            None => Ok(None),
        }
    }

    /// Record one performed exercise. The parent completed program must be
    /// owned by the caller; completion records are never shared.
    pub async fn create(
        &self,
        user_id: i32,
        data: CreateCompletedExercise,
    ) -> ServiceResult<CompletedExerciseWithDetails> {
        data.validate()?;

        let mut tx = self.pool.begin().await?;

        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM user_completed_programs WHERE id = $1 AND user_id = $2
             )",
        )
        .bind(data.completed_program_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !owned {
            return Err(ServiceError::NotFound);
        }

        let row = sqlx::query_as::<_, CompletedExercise>(&format!(
            "INSERT INTO user_completed_exercises
                 (completed_program_id, program_exercise_id, exercise_id,
                  sets, reps, duration, weight, rest_duration)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COMPLETED_COLUMNS}"
        ))
        .bind(data.completed_program_id)
        .bind(data.program_exercise_id)
        .bind(data.exercise_id)
        .bind(data.sets.unwrap_or(1))
        .bind(data.reps)
        .bind(data.duration)
        .bind(data.weight)
        .bind(data.rest_duration)
        .fetch_one(&mut *tx)
        .await?;

        let detailed = detail_for_row(&mut tx, row).await?;
        tx.commit().await?;

        Ok(detailed)
    }

    /// Merge-update a completed exercise. Provided fields replace, absent
    /// fields keep; the reference and reps-or-duration invariants cannot be
    /// broken because fields are never cleared through this path.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        data: UpdateCompletedExercise,
    ) -> ServiceResult<Option<CompletedExerciseWithDetails>> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM user_completed_exercises ce
                 JOIN user_completed_programs cp ON cp.id = ce.completed_program_id
                 WHERE ce.id = $1 AND cp.user_id = $2
             )",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, CompletedExercise>(&format!(
            "UPDATE user_completed_exercises
             SET program_exercise_id = COALESCE($2, program_exercise_id),
                 exercise_id = COALESCE($3, exercise_id),
                 sets = COALESCE($4, sets),
                 reps = COALESCE($5, reps),
                 duration = COALESCE($6, duration),
                 weight = COALESCE($7, weight),
                 rest_duration = COALESCE($8, rest_duration)
             WHERE id = $1
             RETURNING {COMPLETED_COLUMNS}"
        ))
        .bind(id)
        .bind(data.program_exercise_id)
        .bind(data.exercise_id)
        .bind(data.sets)
        .bind(data.reps)
        .bind(data.duration)
        .bind(data.weight)
        .bind(data.rest_duration)
        .fetch_one(&mut *tx)
        .await?;

        let detailed = detail_for_row(&mut tx, row).await?;
        tx.commit().await?;

        Ok(Some(detailed))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM user_completed_exercises ce
                 JOIN user_completed_programs cp ON cp.id = ce.completed_program_id
                 WHERE ce.id = $1 AND cp.user_id = $2
             )",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(false);
        }

        sqlx::query("DELETE FROM user_completed_exercises WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}

/// Left-join the catalog exercise and prescription rows onto a batch of
/// completed exercises. Either side may be absent.
pub(crate) async fn attach_details(
    pool: &PgPool,
    rows: Vec<CompletedExercise>,
) -> Result<Vec<CompletedExerciseWithDetails>, sqlx::Error> {
    let exercise_ids: Vec<i32> = rows.iter().filter_map(|r| r.exercise_id).collect();
    let prescription_ids: Vec<i32> = rows.iter().filter_map(|r| r.program_exercise_id).collect();

    let exercises = sqlx::query_as::<_, Exercise>(&format!(
        "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ANY($1)"
    ))
    .bind(&exercise_ids)
    .fetch_all(pool)
    .await?;
    let exercises_by_id: HashMap<i32, Exercise> =
        exercises.into_iter().map(|e| (e.id, e)).collect();

    let prescriptions = sqlx::query_as::<_, ProgramExercise>(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM exercise_program_exercises WHERE id = ANY($1)"
    ))
    .bind(&prescription_ids)
    .fetch_all(pool)
    .await?;
    let prescriptions_by_id: HashMap<i32, ProgramExercise> =
        prescriptions.into_iter().map(|p| (p.id, p)).collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let exercise = row
                .exercise_id
                .and_then(|id| exercises_by_id.get(&id).cloned());
            let program_exercise = row
                .program_exercise_id
                .and_then(|id| prescriptions_by_id.get(&id).cloned());
            CompletedExerciseWithDetails {
                completed: row,
                exercise,
                program_exercise,
            }
        })
        .collect())
}

async fn detail_for_row(
    tx: &mut Transaction<'_, Postgres>,
    row: CompletedExercise,
) -> Result<CompletedExerciseWithDetails, sqlx::Error> {
    let exercise = match row.exercise_id {
        Some(id) => {
            sqlx::query_as::<_, Exercise>(&format!(
                "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        }
        None => None,
    };

    let program_exercise = match row.program_exercise_id {
        Some(id) => {
            sqlx::query_as::<_, ProgramExercise>(&format!(
                "SELECT {PRESCRIPTION_COLUMNS} FROM exercise_program_exercises WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        }
        None => None,
    };

    Ok(CompletedExerciseWithDetails {
        completed: row,
        exercise,
        program_exercise,
    })
}
