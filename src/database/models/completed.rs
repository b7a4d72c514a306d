use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::exercise::Exercise;
use super::program::ProgramExercise;

/// One actual run of a program by a user. Strictly user-owned; a null
/// `end_date` means the run is still in progress.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompletedProgram {
    pub id: i32,
    pub user_id: i32,
    pub program_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One exercise actually performed within a completed program. Links back
/// to the program prescription and/or the catalog exercise it came from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub id: i32,
    pub completed_program_id: i32,
    pub program_exercise_id: Option<i32>,
    pub exercise_id: Option<i32>,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
    pub weight: Option<f64>,
    pub rest_duration: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExerciseWithDetails {
    #[serde(flatten)]
    pub completed: CompletedExercise,
    pub exercise: Option<Exercise>,
    pub program_exercise: Option<ProgramExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedProgramWithExercises {
    #[serde(flatten)]
    pub program: CompletedProgram,
    pub completed_exercises: Vec<CompletedExerciseWithDetails>,
}
