use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled instance of an exercise program. Carries no owner of its
/// own: visibility is derived transitively from the referenced program.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlannedProgram {
    pub id: i32,
    pub program_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlannedProgramDate {
    pub id: i32,
    pub planned_program_id: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedProgramWithDates {
    #[serde(flatten)]
    pub planned: PlannedProgram,
    pub dates: Vec<PlannedProgramDate>,
}
