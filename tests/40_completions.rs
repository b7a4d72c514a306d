//! Completion tracker behavior: strict user scoping and the two storage
//! invariants. Every test skips cleanly when DATABASE_URL is not configured.

mod common;

use chrono::{TimeZone, Utc};

use fittrack_api_rust::services::completed_exercise_service::{
    CreateCompletedExercise, UpdateCompletedExercise,
};
use fittrack_api_rust::services::completed_program_service::{
    CreateCompletedProgram, UpdateCompletedProgram,
};
use fittrack_api_rust::services::program_service::CreateExerciseProgram;
use fittrack_api_rust::services::{
    CompletedExerciseService, CompletedProgramService, ProgramService, ServiceError,
};

async fn create_program(pool: &sqlx::PgPool, user_id: Option<i32>) -> i32 {
    let difficulty = common::create_difficulty_level(pool).await;
    ProgramService::new(pool.clone())
        .create(CreateExerciseProgram {
            name: "Completion Target".to_string(),
            description: "completion test".to_string(),
            difficulty_level_id: difficulty,
            user_id,
            subscription_id: None,
            is_user_added: None,
            fitness_goal_ids: vec![],
            exercise_ids: vec![],
        })
        .await
        .unwrap()
        .id
}

fn completed_exercise(completed_program_id: i32, exercise_id: i32) -> CreateCompletedExercise {
    CreateCompletedExercise {
        completed_program_id,
        program_exercise_id: None,
        exercise_id: Some(exercise_id),
        sets: None,
        reps: Some(10),
        duration: None,
        weight: Some(42.5),
        rest_duration: Some(60),
    }
}

#[tokio::test]
async fn completion_records_are_never_shared() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = CompletedProgramService::new(pool.clone());
    let exercises = CompletedExerciseService::new(pool.clone());

    let owner = common::create_user(&pool).await;
    let intruder = common::create_user(&pool).await;
    let program_id = create_program(&pool, None).await;
    let exercise_id = common::create_exercise(&pool).await;

    let run = programs
        .create(
            owner,
            CreateCompletedProgram {
                program_id,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();

    // Even though the program itself is shared, the run is not
    assert!(programs.get_by_id(run.program.id, intruder).await.unwrap().is_none());
    assert!(exercises
        .get_all_by_program(run.program.id, intruder)
        .await
        .unwrap()
        .is_none());

    let before = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM user_completed_exercises WHERE completed_program_id = $1",
    )
    .bind(run.program.id)
    .fetch_one(&pool)
    .await
    .unwrap();

    match exercises
        .create(intruder, completed_exercise(run.program.id, exercise_id))
        .await
    {
        Err(ServiceError::NotFound) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|e| e.completed.id)),
    }

    let after = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM user_completed_exercises WHERE completed_program_id = $1",
    )
    .bind(run.program.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(before, after, "failed create must not insert a row");
}

#[tokio::test]
async fn completed_exercise_requires_a_reference_and_a_measure() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = CompletedProgramService::new(pool.clone());
    let exercises = CompletedExerciseService::new(pool.clone());

    let user = common::create_user(&pool).await;
    let program_id = create_program(&pool, Some(user)).await;
    let exercise_id = common::create_exercise(&pool).await;

    let run = programs
        .create(
            user,
            CreateCompletedProgram {
                program_id,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();

    let mut missing_refs = completed_exercise(run.program.id, exercise_id);
    missing_refs.exercise_id = None;
    assert!(matches!(
        exercises.create(user, missing_refs).await,
        Err(ServiceError::Validation(_))
    ));

    let mut missing_measure = completed_exercise(run.program.id, exercise_id);
    missing_measure.reps = None;
    missing_measure.duration = None;
    assert!(matches!(
        exercises.create(user, missing_measure).await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn completed_exercise_round_trip_with_enrichment() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = CompletedProgramService::new(pool.clone());
    let exercises = CompletedExerciseService::new(pool.clone());

    let user = common::create_user(&pool).await;
    let program_id = create_program(&pool, Some(user)).await;
    let exercise_id = common::create_exercise(&pool).await;

    let run = programs
        .create(
            user,
            CreateCompletedProgram {
                program_id,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();

    let created = exercises
        .create(user, completed_exercise(run.program.id, exercise_id))
        .await
        .unwrap();
    assert_eq!(created.completed.sets, 1, "sets defaults to 1");
    assert_eq!(
        created.exercise.as_ref().map(|e| e.id),
        Some(exercise_id),
        "catalog enrichment expected"
    );
    assert!(created.program_exercise.is_none());

    let updated = exercises
        .update(
            created.completed.id,
            user,
            UpdateCompletedExercise {
                sets: Some(4),
                reps: Some(12),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.completed.sets, 4);
    assert_eq!(updated.completed.reps, Some(12));
    // Absent fields keep their values
    assert_eq!(updated.completed.weight, Some(42.5));

    let listed = exercises
        .get_all_by_program(run.program.id, user)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.len(), 1);

    assert!(exercises.delete(created.completed.id, user).await.unwrap());
    assert!(exercises.get_by_id(created.completed.id, user).await.unwrap().is_none());
}

#[tokio::test]
async fn end_date_distinguishes_done_from_in_progress() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = CompletedProgramService::new(pool.clone());

    let user = common::create_user(&pool).await;
    let program_id = create_program(&pool, Some(user)).await;

    let run = programs
        .create(
            user,
            CreateCompletedProgram {
                program_id,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
    assert!(run.program.end_date.is_none(), "new runs are in progress");

    let finished_at = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
    let updated = programs
        .update(
            run.program.id,
            user,
            UpdateCompletedProgram {
                end_date: Some(Some(finished_at)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.program.end_date, Some(finished_at));

    // Explicit null reopens the run; absent leaves it finished
    let untouched = programs
        .update(run.program.id, user, UpdateCompletedProgram::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.program.end_date, Some(finished_at));

    let reopened = programs
        .update(
            run.program.id,
            user,
            UpdateCompletedProgram {
                end_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(reopened.program.end_date.is_none());
}

#[tokio::test]
async fn list_orders_runs_most_recent_first() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = CompletedProgramService::new(pool.clone());

    let user = common::create_user(&pool).await;
    let program_id = create_program(&pool, Some(user)).await;

    let older = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();

    programs
        .create(
            user,
            CreateCompletedProgram {
                program_id,
                start_date: Some(older),
                end_date: None,
            },
        )
        .await
        .unwrap();
    programs
        .create(
            user,
            CreateCompletedProgram {
                program_id,
                start_date: Some(newer),
                end_date: None,
            },
        )
        .await
        .unwrap();

    let listed = programs.list(user).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].program.start_date, newer);
    assert_eq!(listed[1].program.start_date, older);
}
