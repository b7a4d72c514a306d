use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::exercise::Exercise;
use super::reference::FitnessGoal;

/// An exercise program. `user_id = NULL` marks a system program shared with
/// every user; a non-null owner makes the row private to that user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgram {
    pub id: i32,
    pub user_id: Option<i32>,
    pub is_user_added: bool,
    pub name: String,
    pub description: Option<String>,
    pub difficulty_level_id: i32,
    pub subscription_id: Option<i32>,
}

impl ExerciseProgram {
    pub fn visible_to(&self, user_id: i32) -> bool {
        self.user_id.is_none() || self.user_id == Some(user_id)
    }
}

/// One prescription row: the sets/reps/duration/rest parameters of a single
/// exercise at a given position within a program.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProgramExercise {
    pub id: i32,
    pub program_id: i32,
    pub exercise_id: i32,
    #[sqlx(rename = "sort_order")]
    #[serde(rename = "order")]
    pub order: i32,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
    pub rest_duration: Option<i32>,
}

/// Catalog exercise enriched with its prescription in one program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInProgram {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub program_exercise: ProgramExercise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramWithDetails {
    #[serde(flatten)]
    pub program: ExerciseProgram,
    pub exercises: Vec<ExerciseInProgram>,
    pub fitness_goals: Vec<FitnessGoal>,
}
