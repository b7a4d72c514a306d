use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::exercise::Exercise;
use crate::types::parse_id_list;

use super::ServiceResult;

/// Query-string filters for the exercise catalog. Each value is a
/// comma-separated id list; a list that fails to parse is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseFilter {
    pub category_id: Option<String>,
    pub muscle_group_id: Option<String>,
    pub difficulty_level_id: Option<String>,
}

pub struct ExerciseService {
    pool: PgPool,
}

impl ExerciseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List catalog exercises. Each supplied filter is an OR across its ids;
    /// all filters are AND'd together.
    pub async fn get_all(&self, filter: &ExerciseFilter) -> ServiceResult<Vec<Exercise>> {
        let category_ids = filter.category_id.as_deref().and_then(parse_id_list);
        let muscle_group_ids = filter.muscle_group_id.as_deref().and_then(parse_id_list);
        let difficulty_ids = filter.difficulty_level_id.as_deref().and_then(parse_id_list);

        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, description, category_id, muscle_group_id, difficulty_level_id
             FROM exercises
             WHERE ($1::int4[] IS NULL OR category_id = ANY($1))
               AND ($2::int4[] IS NULL OR muscle_group_id = ANY($2))
               AND ($3::int4[] IS NULL OR difficulty_level_id = ANY($3))
             ORDER BY id",
        )
        .bind(&category_ids)
        .bind(&muscle_group_ids)
        .bind(&difficulty_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn get_by_id(&self, id: i32) -> ServiceResult<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, description, category_id, muscle_group_id, difficulty_level_id
             FROM exercises WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exercise)
    }
}
