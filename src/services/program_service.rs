//! Exercise program composition: programs plus their two child
//! collections, fitness-goal tags and ordered exercise prescriptions.

use std::collections::HashMap;

use futures::future::try_join_all;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::exercise::Exercise;
use crate::database::models::program::{
    ExerciseInProgram, ExerciseProgram, ProgramExercise, ProgramWithDetails,
};
use crate::database::models::reference::FitnessGoal;
use crate::types::parse_id_list;

use super::reconcile::{reconcile, PrescriptionInput};
use super::{ServiceError, ServiceResult};

const PROGRAM_COLUMNS: &str =
    "id, user_id, is_user_added, name, description, difficulty_level_id, subscription_id";
const PRESCRIPTION_COLUMNS: &str =
    "id, program_id, exercise_id, sort_order, sets, reps, duration, rest_duration";

/// Query-string filters; comma-separated id lists, parse-or-ignore.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFilter {
    pub difficulty_level_id: Option<String>,
    pub subscription_id: Option<String>,
    pub fitness_goal_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseProgram {
    pub name: String,
    pub description: String,
    pub difficulty_level_id: i32,
    /// None creates a system program shared with every user
    pub user_id: Option<i32>,
    pub subscription_id: Option<i32>,
    pub is_user_added: Option<bool>,
    #[serde(default)]
    pub fitness_goal_ids: Vec<i32>,
    #[serde(default)]
    pub exercise_ids: Vec<PrescriptionInput>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseProgram {
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty_level_id: Option<i32>,
    pub subscription_id: Option<i32>,
    pub is_user_added: Option<bool>,
    /// Distinguishes absent (keep) from explicit null (release to the
    /// system catalog); only honored on already user-owned programs.
    #[serde(default, with = "serde_with::rust::double_option")]
    pub user_id: Option<Option<i32>>,
    /// Present (even empty) replaces the full tag set
    pub fitness_goal_ids: Option<Vec<i32>>,
    /// Present triggers prescription reconciliation
    pub exercise_ids: Option<Vec<PrescriptionInput>>,
}

pub struct ProgramService {
    pool: PgPool,
}

impl ProgramService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List programs visible to the user (their own plus the system
    /// catalog), enriched with ordered prescriptions and fitness goals.
    pub async fn list(
        &self,
        user_id: i32,
        filter: &ProgramFilter,
    ) -> ServiceResult<Vec<ProgramWithDetails>> {
        let difficulty_ids = filter.difficulty_level_id.as_deref().and_then(parse_id_list);
        let subscription_ids = filter.subscription_id.as_deref().and_then(parse_id_list);
        let goal_ids = filter.fitness_goal_id.as_deref().and_then(parse_id_list);

        let programs = sqlx::query_as::<_, ExerciseProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM exercise_programs
             WHERE (user_id = $1 OR user_id IS NULL)
               AND ($2::int4[] IS NULL OR difficulty_level_id = ANY($2))
               AND ($3::int4[] IS NULL OR subscription_id = ANY($3))
             ORDER BY id"
        ))
        .bind(user_id)
        .bind(&difficulty_ids)
        .bind(&subscription_ids)
        .fetch_all(&self.pool)
        .await?;

        // Enrichment reads are independent per program; fan out concurrently.
        let detailed = try_join_all(programs.into_iter().map(|p| self.enrich(p))).await?;

        // The fitness-goal filter needs the joined tags, so it runs post-fetch.
        Ok(detailed
            .into_iter()
            .filter(|p| match &goal_ids {
                Some(ids) => p.fitness_goals.iter().any(|goal| ids.contains(&goal.id)),
                None => true,
            })
            .collect())
    }

    pub async fn get_by_id(
        &self,
        id: i32,
        user_id: i32,
    ) -> ServiceResult<Option<ProgramWithDetails>> {
        let program = sqlx::query_as::<_, ExerciseProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM exercise_programs
             WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match program {
            Some(program) => Ok(Some(self.enrich(program).await?)),
            None => Ok(None),
        }
    }

    /// Insert the program row plus its goal links and prescriptions in one
    /// transaction. Returns the bare row; callers re-fetch for full detail.
    pub async fn create(&self, data: CreateExerciseProgram) -> ServiceResult<ExerciseProgram> {
        for prescription in &data.exercise_ids {
            prescription.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        let program = sqlx::query_as::<_, ExerciseProgram>(&format!(
            "INSERT INTO exercise_programs
                 (user_id, is_user_added, name, description, difficulty_level_id, subscription_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(data.user_id)
        .bind(data.is_user_added.unwrap_or(false))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.difficulty_level_id)
        .bind(data.subscription_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_goal_links(&mut tx, program.id, &data.fitness_goal_ids).await?;
        for prescription in &data.exercise_ids {
            insert_prescription(&mut tx, program.id, prescription).await?;
        }

        tx.commit().await?;
        Ok(program)
    }

    /// Partial update. Scalars are replace-if-provided; `fitnessGoalIds`
    /// replaces wholesale when present; `exerciseIds` runs the reconciliation
    /// algorithm. Returns None when the program is absent or not visible.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        data: UpdateExerciseProgram,
    ) -> ServiceResult<Option<ExerciseProgram>> {
        if let Some(rows) = &data.exercise_ids {
            for prescription in rows {
                prescription.validate()?;
            }
        }

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, ExerciseProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM exercise_programs
             WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        // System programs cannot be claimed through this path
        let next_user_id = if existing.user_id.is_some() {
            match data.user_id {
                Some(reassigned) => reassigned,
                None => existing.user_id,
            }
        } else {
            existing.user_id
        };

        let updated = sqlx::query_as::<_, ExerciseProgram>(&format!(
            "UPDATE exercise_programs
             SET user_id = $2, is_user_added = $3, name = $4, description = $5,
                 difficulty_level_id = $6, subscription_id = $7
             WHERE id = $1
             RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(id)
        .bind(next_user_id)
        .bind(data.is_user_added.unwrap_or(existing.is_user_added))
        .bind(data.name.as_deref().unwrap_or(&existing.name))
        .bind(data.description.clone().or_else(|| existing.description.clone()))
        .bind(data.difficulty_level_id.unwrap_or(existing.difficulty_level_id))
        .bind(data.subscription_id.or(existing.subscription_id))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(goal_ids) = &data.fitness_goal_ids {
            sqlx::query("DELETE FROM exercise_program_fitness_goals WHERE program_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_goal_links(&mut tx, id, goal_ids).await?;
        }

        if let Some(incoming) = &data.exercise_ids {
            self.reconcile_prescriptions(&mut tx, id, incoming).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Cascade-delete goal links, prescriptions, then the program row.
    /// Prescriptions referenced by completion history keep their foreign
    /// key, so such a delete fails at the storage layer rather than
    /// orphaning history.
    pub async fn delete(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        let mut tx = self.pool.begin().await?;

        let visible = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM exercise_programs
                 WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)
             )",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !visible {
            return Ok(false);
        }

        sqlx::query("DELETE FROM exercise_program_fitness_goals WHERE program_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM exercise_program_exercises WHERE program_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM exercise_programs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Diff the payload against the existing prescription rows, then apply
    /// updates/inserts and delete whatever fell out of the payload, except
    /// rows still referenced by completion history.
    async fn reconcile_prescriptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        program_id: i32,
        incoming: &[PrescriptionInput],
    ) -> Result<(), ServiceError> {
        let existing_ids = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM exercise_program_exercises WHERE program_id = $1",
        )
        .bind(program_id)
        .fetch_all(&mut **tx)
        .await?;

        let plan = reconcile(&existing_ids, incoming);

        for row in &plan.to_update {
            sqlx::query(
                "UPDATE exercise_program_exercises
                 SET exercise_id = $2,
                     sort_order = COALESCE($3, sort_order),
                     sets = $4,
                     reps = COALESCE($5, reps),
                     duration = COALESCE($6, duration),
                     rest_duration = COALESCE($7, rest_duration)
                 WHERE id = $1",
            )
            .bind(row.id)
            .bind(row.exercise_id)
            .bind(row.order)
            .bind(row.sets)
            .bind(row.reps)
            .bind(row.duration)
            .bind(row.rest_duration)
            .execute(&mut **tx)
            .await?;
        }

        for row in &plan.to_insert {
            insert_prescription(tx, program_id, row).await?;
        }

        if !plan.to_delete_candidates.is_empty() {
            let referenced = sqlx::query_scalar::<_, i32>(
                "SELECT DISTINCT program_exercise_id FROM user_completed_exercises
                 WHERE program_exercise_id = ANY($1)",
            )
            .bind(&plan.to_delete_candidates)
            .fetch_all(&mut **tx)
            .await?;

            let deletable: Vec<i32> = plan
                .to_delete_candidates
                .iter()
                .copied()
                .filter(|candidate| !referenced.contains(candidate))
                .collect();

            if !deletable.is_empty() {
                sqlx::query("DELETE FROM exercise_program_exercises WHERE id = ANY($1)")
                    .bind(&deletable)
                    .execute(&mut **tx)
                    .await?;
            }
        }

        Ok(())
    }

    async fn enrich(&self, program: ExerciseProgram) -> Result<ProgramWithDetails, ServiceError> {
        let prescriptions = sqlx::query_as::<_, ProgramExercise>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM exercise_program_exercises
             WHERE program_id = $1
             ORDER BY sort_order"
        ))
        .bind(program.id)
        .fetch_all(&self.pool)
        .await?;

        let exercise_ids: Vec<i32> = prescriptions.iter().map(|p| p.exercise_id).collect();
        let catalog = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, description, category_id, muscle_group_id, difficulty_level_id
             FROM exercises WHERE id = ANY($1)",
        )
        .bind(&exercise_ids)
        .fetch_all(&self.pool)
        .await?;
        let catalog_by_id: HashMap<i32, Exercise> =
            catalog.into_iter().map(|e| (e.id, e)).collect();

        let exercises = prescriptions
            .into_iter()
            .filter_map(|prescription| {
                catalog_by_id
                    .get(&prescription.exercise_id)
                    .cloned()
                    .map(|exercise| ExerciseInProgram {
                        exercise,
                        program_exercise: prescription,
                    })
            })
            .collect();

        let fitness_goals = sqlx::query_as::<_, FitnessGoal>(
            "SELECT fg.id, fg.name
             FROM exercise_program_fitness_goals link
             JOIN fitness_goals fg ON fg.id = link.fitness_goal_id
             WHERE link.program_id = $1",
        )
        .bind(program.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProgramWithDetails {
            program,
            exercises,
            fitness_goals,
        })
    }
}

async fn insert_goal_links(
    tx: &mut Transaction<'_, Postgres>,
    program_id: i32,
    goal_ids: &[i32],
) -> Result<(), sqlx::Error> {
    for goal_id in goal_ids {
        sqlx::query(
            "INSERT INTO exercise_program_fitness_goals (program_id, fitness_goal_id)
             VALUES ($1, $2)",
        )
        .bind(program_id)
        .bind(goal_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_prescription(
    tx: &mut Transaction<'_, Postgres>,
    program_id: i32,
    prescription: &PrescriptionInput,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO exercise_program_exercises
             (program_id, exercise_id, sort_order, sets, reps, duration, rest_duration)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(program_id)
    .bind(prescription.exercise_id)
    .bind(prescription.order.unwrap_or(1))
    .bind(prescription.sets)
    .bind(prescription.reps)
    .bind(prescription.duration)
    .bind(prescription.rest_duration)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
