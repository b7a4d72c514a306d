pub mod completed_exercise_service;
pub mod completed_program_service;
pub mod exercise_service;
pub mod planned_program_service;
pub mod program_service;
pub mod reconcile;
pub mod reference_service;
pub mod user_subscription_service;
pub mod visibility;

use thiserror::Error;

/// Service-level error taxonomy shared by every component.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Row absent or not visible to the caller. The two cases are kept
    /// indistinguishable so callers cannot probe for other users' data.
    #[error("not found")]
    NotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub use completed_exercise_service::CompletedExerciseService;
pub use completed_program_service::CompletedProgramService;
pub use exercise_service::ExerciseService;
pub use planned_program_service::PlannedProgramService;
pub use program_service::ProgramService;
pub use reference_service::ReferenceService;
pub use user_subscription_service::UserSubscriptionService;
