//! Planned calendar scheduling for exercise programs. A planned program
//! has no owner of its own; every operation authorizes by walking the
//! foreign key up to the owning exercise program.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::planned::{PlannedProgram, PlannedProgramDate, PlannedProgramWithDates};

use super::visibility::resolve_program_visibility;
use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlannedProgram {
    pub program_id: i32,
    #[serde(default)]
    pub dates: Vec<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlannedProgram {
    pub program_id: Option<i32>,
    /// Present (even null or empty) replaces the full date set
    #[serde(default, with = "serde_with::rust::double_option")]
    pub dates: Option<Option<Vec<DateTime<Utc>>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlannedDate {
    pub planned_program_id: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlannedDate {
    pub date: Option<DateTime<Utc>>,
}

pub struct PlannedProgramService {
    pool: PgPool,
}

impl PlannedProgramService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All planned programs whose owning program is visible to the user,
    /// each with its dates.
    pub async fn list(&self, user_id: i32) -> ServiceResult<Vec<PlannedProgramWithDates>> {
        let planned = sqlx::query_as::<_, PlannedProgram>(
            "SELECT pp.id, pp.program_id
             FROM planned_exercise_programs pp
             JOIN exercise_programs ep ON ep.id = pp.program_id
             WHERE ep.user_id = $1 OR ep.user_id IS NULL
             ORDER BY pp.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(planned.len());
        for row in planned {
            let dates = self.dates_for(row.id).await?;
            result.push(PlannedProgramWithDates {
                planned: row,
                dates,
            });
        }
        Ok(result)
    }

    pub async fn get_by_id(
        &self,
        id: i32,
        user_id: i32,
    ) -> ServiceResult<Option<PlannedProgramWithDates>> {
        let planned = sqlx::query_as::<_, PlannedProgram>(
            "SELECT pp.id, pp.program_id
             FROM planned_exercise_programs pp
             JOIN exercise_programs ep ON ep.id = pp.program_id
             WHERE pp.id = $1 AND (ep.user_id = $2 OR ep.user_id IS NULL)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match planned {
            Some(planned) => {
                let dates = self.dates_for(planned.id).await?;
                Ok(Some(PlannedProgramWithDates { planned, dates }))
            }
            None => Ok(None),
        }
    }

    /// Create a planned program with its dates in one transaction. Fails
    /// with NotFound when the referenced program is not visible.
    pub async fn create(
        &self,
        data: CreatePlannedProgram,
        user_id: i32,
    ) -> ServiceResult<PlannedProgramWithDates> {
        if !resolve_program_visibility(&self.pool, data.program_id, user_id).await? {
            return Err(ServiceError::NotFound);
        }

        let mut tx = self.pool.begin().await?;

        let planned = sqlx::query_as::<_, PlannedProgram>(
            "INSERT INTO planned_exercise_programs (program_id)
             VALUES ($1)
             RETURNING id, program_id",
        )
        .bind(data.program_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_dates(&mut tx, planned.id, &data.dates).await?;
        let dates = dates_for_tx(&mut tx, planned.id).await?;

        tx.commit().await?;
        Ok(PlannedProgramWithDates { planned, dates })
    }

    /// Update the program reference and/or replace the full date set.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        data: UpdatePlannedProgram,
    ) -> ServiceResult<Option<PlannedProgramWithDates>> {
        if self.get_by_id(id, user_id).await?.is_none() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let planned = sqlx::query_as::<_, PlannedProgram>(
            "UPDATE planned_exercise_programs
             SET program_id = COALESCE($2, program_id)
             WHERE id = $1
             RETURNING id, program_id",
        )
        .bind(id)
        .bind(data.program_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(replacement) = data.dates {
            sqlx::query("DELETE FROM planned_exercise_program_dates WHERE planned_program_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if let Some(dates) = replacement {
                insert_dates(&mut tx, id, &dates).await?;
            }
        }

        let dates = dates_for_tx(&mut tx, id).await?;
        tx.commit().await?;

        Ok(Some(PlannedProgramWithDates { planned, dates }))
    }

    /// Delete the planned program; its dates cascade via foreign key.
    pub async fn delete(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        if self.get_by_id(id, user_id).await?.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM planned_exercise_programs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    /// Add one date to an existing planned program.
    pub async fn create_date(
        &self,
        data: CreatePlannedDate,
        user_id: i32,
    ) -> ServiceResult<PlannedProgramDate> {
        let program_id = sqlx::query_scalar::<_, i32>(
            "SELECT program_id FROM planned_exercise_programs WHERE id = $1",
        )
        .bind(data.planned_program_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(program_id) = program_id else {
            return Err(ServiceError::NotFound);
        };
        if !resolve_program_visibility(&self.pool, program_id, user_id).await? {
            return Err(ServiceError::NotFound);
        }

        let date = sqlx::query_as::<_, PlannedProgramDate>(
            "INSERT INTO planned_exercise_program_dates (planned_program_id, date)
             VALUES ($1, $2)
             RETURNING id, planned_program_id, date",
        )
        .bind(data.planned_program_id)
        .bind(data.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(date)
    }

    pub async fn update_date(
        &self,
        id: i32,
        user_id: i32,
        data: UpdatePlannedDate,
    ) -> ServiceResult<Option<PlannedProgramDate>> {
        if !self.date_visible(id, user_id).await? {
            return Ok(None);
        }

        let date = sqlx::query_as::<_, PlannedProgramDate>(
            "UPDATE planned_exercise_program_dates
             SET date = COALESCE($2, date)
             WHERE id = $1
             RETURNING id, planned_program_id, date",
        )
        .bind(id)
        .bind(data.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(date))
    }

    pub async fn delete_date(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        if !self.date_visible(id, user_id).await? {
            return Ok(false);
        }

        sqlx::query("DELETE FROM planned_exercise_program_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    /// A date is accessible when the program at the top of its foreign-key
    /// chain is.
    async fn date_visible(&self, date_id: i32, user_id: i32) -> Result<bool, ServiceError> {
        let program_id = sqlx::query_scalar::<_, i32>(
            "SELECT pp.program_id
             FROM planned_exercise_program_dates d
             JOIN planned_exercise_programs pp ON pp.id = d.planned_program_id
             WHERE d.id = $1",
        )
        .bind(date_id)
        .fetch_optional(&self.pool)
        .await?;

        match program_id {
            Some(program_id) => {
                Ok(resolve_program_visibility(&self.pool, program_id, user_id).await?)
            }
            None => Ok(false),
        }
    }

    async fn dates_for(&self, planned_id: i32) -> Result<Vec<PlannedProgramDate>, ServiceError> {
        let dates = sqlx::query_as::<_, PlannedProgramDate>(
            "SELECT id, planned_program_id, date
             FROM planned_exercise_program_dates
             WHERE planned_program_id = $1
             ORDER BY id",
        )
        .bind(planned_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }
}

async fn insert_dates(
    tx: &mut Transaction<'_, Postgres>,
    planned_id: i32,
    dates: &[DateTime<Utc>],
) -> Result<(), sqlx::Error> {
    for date in dates {
        sqlx::query(
            "INSERT INTO planned_exercise_program_dates (planned_program_id, date)
             VALUES ($1, $2)",
        )
        .bind(planned_id)
        .bind(date)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn dates_for_tx(
    tx: &mut Transaction<'_, Postgres>,
    planned_id: i32,
) -> Result<Vec<PlannedProgramDate>, sqlx::Error> {
    sqlx::query_as::<_, PlannedProgramDate>(
        "SELECT id, planned_program_id, date
         FROM planned_exercise_program_dates
         WHERE planned_program_id = $1
         ORDER BY id",
    )
    .bind(planned_id)
    .fetch_all(&mut **tx)
    .await
}
