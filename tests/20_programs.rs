//! Program composer behavior against a live database. Every test skips
//! cleanly when DATABASE_URL is not configured.

mod common;

use fittrack_api_rust::services::completed_exercise_service::CreateCompletedExercise;
use fittrack_api_rust::services::completed_program_service::CreateCompletedProgram;
use fittrack_api_rust::services::program_service::{
    CreateExerciseProgram, ProgramFilter, UpdateExerciseProgram,
};
use fittrack_api_rust::services::reconcile::PrescriptionInput;
use fittrack_api_rust::services::{
    CompletedExerciseService, CompletedProgramService, ProgramService, ServiceError,
};

fn prescription(exercise_id: i32, reps: i32, rest: i32) -> PrescriptionInput {
    PrescriptionInput {
        id: None,
        exercise_id,
        order: None,
        sets: 3,
        reps: Some(reps),
        duration: None,
        rest_duration: Some(rest),
    }
}

fn program_input(
    name: &str,
    difficulty_level_id: i32,
    user_id: Option<i32>,
) -> CreateExerciseProgram {
    CreateExerciseProgram {
        name: name.to_string(),
        description: "test program".to_string(),
        difficulty_level_id,
        user_id,
        subscription_id: None,
        is_user_added: None,
        fitness_goal_ids: vec![],
        exercise_ids: vec![],
    }
}

#[tokio::test]
async fn system_program_is_visible_and_enriched_for_any_user() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let exercise = common::create_exercise(&pool).await;
    let reader = common::create_user(&pool).await;

    let mut input = program_input("Beginner Full Body", difficulty, None);
    input.exercise_ids = vec![prescription(exercise, 10, 60)];
    let created = service.create(input).await.unwrap();
    assert_eq!(created.user_id, None);

    // A user with no relation to the program still sees a system program
    let fetched = service.get_by_id(created.id, reader).await.unwrap().unwrap();
    assert_eq!(fetched.exercises.len(), 1);
    let entry = &fetched.exercises[0];
    assert_eq!(entry.program_exercise.reps, Some(10));
    assert_eq!(entry.program_exercise.rest_duration, Some(60));
    assert_eq!(entry.exercise.id, exercise);
}

#[tokio::test]
async fn update_with_recognized_id_modifies_in_place() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let exercise = common::create_exercise(&pool).await;
    let owner = common::create_user(&pool).await;

    let mut input = program_input("Strength Base", difficulty, Some(owner));
    input.exercise_ids = vec![prescription(exercise, 10, 60)];
    let created = service.create(input).await.unwrap();

    let existing = service.get_by_id(created.id, owner).await.unwrap().unwrap();
    let row_id = existing.exercises[0].program_exercise.id;

    let payload = vec![PrescriptionInput {
        id: Some(row_id),
        exercise_id: exercise,
        order: None,
        sets: 4,
        reps: Some(12),
        duration: None,
        rest_duration: Some(90),
    }];

    let patch = UpdateExerciseProgram {
        exercise_ids: Some(payload.clone()),
        ..Default::default()
    };
    service.update(created.id, owner, patch).await.unwrap().unwrap();

    let after = service.get_by_id(created.id, owner).await.unwrap().unwrap();
    assert_eq!(after.exercises.len(), 1, "no duplicate row expected");
    assert_eq!(after.exercises[0].program_exercise.id, row_id);
    assert_eq!(after.exercises[0].program_exercise.sets, 4);
    assert_eq!(after.exercises[0].program_exercise.reps, Some(12));

    // Replaying the identical payload changes nothing
    let patch = UpdateExerciseProgram {
        exercise_ids: Some(payload),
        ..Default::default()
    };
    service.update(created.id, owner, patch).await.unwrap().unwrap();
    let again = service.get_by_id(created.id, owner).await.unwrap().unwrap();
    assert_eq!(again.exercises.len(), 1);
    assert_eq!(again.exercises[0].program_exercise.id, row_id);
}

#[tokio::test]
async fn private_programs_are_invisible_to_other_users() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let owner = common::create_user(&pool).await;
    let stranger = common::create_user(&pool).await;

    let created = service
        .create(program_input("Private Plan", difficulty, Some(owner)))
        .await
        .unwrap();

    assert!(service.get_by_id(created.id, owner).await.unwrap().is_some());
    assert!(service.get_by_id(created.id, stranger).await.unwrap().is_none());

    let patch = UpdateExerciseProgram {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    assert!(service.update(created.id, stranger, patch).await.unwrap().is_none());
    assert!(!service.delete(created.id, stranger).await.unwrap());

    // The stranger's list never contains the private program
    let listed = service.list(stranger, &ProgramFilter::default()).await.unwrap();
    assert!(listed.iter().all(|p| p.program.id != created.id));

    assert!(service.delete(created.id, owner).await.unwrap());
}

#[tokio::test]
async fn prescriptions_referenced_by_history_survive_reconciliation() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let programs = ProgramService::new(pool.clone());
    let completions = CompletedProgramService::new(pool.clone());
    let completed_exercises = CompletedExerciseService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let exercise = common::create_exercise(&pool).await;
    let owner = common::create_user(&pool).await;

    let mut input = program_input("History Guard", difficulty, Some(owner));
    input.exercise_ids = vec![
        prescription(exercise, 10, 60),
        prescription(exercise, 8, 60),
        prescription(exercise, 6, 60),
    ];
    let created = programs.create(input).await.unwrap();

    let detail = programs.get_by_id(created.id, owner).await.unwrap().unwrap();
    let row_a = detail.exercises[0].program_exercise.id;
    let row_b = detail.exercises[1].program_exercise.id;
    let row_c = detail.exercises[2].program_exercise.id;

    // Record history against row A
    let run = completions
        .create(
            owner,
            CreateCompletedProgram {
                program_id: created.id,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
    completed_exercises
        .create(
            owner,
            CreateCompletedExercise {
                completed_program_id: run.program.id,
                program_exercise_id: Some(row_a),
                exercise_id: None,
                sets: Some(3),
                reps: Some(10),
                duration: None,
                weight: None,
                rest_duration: None,
            },
        )
        .await
        .unwrap();

    // Payload keeps only row B: A is protected by history, C is deletable
    let patch = UpdateExerciseProgram {
        exercise_ids: Some(vec![PrescriptionInput {
            id: Some(row_b),
            exercise_id: exercise,
            order: None,
            sets: 5,
            reps: Some(5),
            duration: None,
            rest_duration: Some(120),
        }]),
        ..Default::default()
    };
    programs.update(created.id, owner, patch).await.unwrap().unwrap();

    let after = programs.get_by_id(created.id, owner).await.unwrap().unwrap();
    let remaining: Vec<i32> = after
        .exercises
        .iter()
        .map(|e| e.program_exercise.id)
        .collect();
    assert!(remaining.contains(&row_a), "referenced row must survive");
    assert!(remaining.contains(&row_b));
    assert!(!remaining.contains(&row_c), "unreferenced row is deleted");
}

#[tokio::test]
async fn fitness_goal_key_replaces_the_whole_tag_set() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let goal_a = common::create_fitness_goal(&pool).await;
    let goal_b = common::create_fitness_goal(&pool).await;
    let owner = common::create_user(&pool).await;

    let mut input = program_input("Tagged", difficulty, Some(owner));
    input.fitness_goal_ids = vec![goal_a, goal_b];
    let created = service.create(input).await.unwrap();

    let patch = UpdateExerciseProgram {
        fitness_goal_ids: Some(vec![goal_b]),
        ..Default::default()
    };
    service.update(created.id, owner, patch).await.unwrap().unwrap();
    let detail = service.get_by_id(created.id, owner).await.unwrap().unwrap();
    let tags: Vec<i32> = detail.fitness_goals.iter().map(|g| g.id).collect();
    assert_eq!(tags, vec![goal_b]);

    // An explicitly empty list clears every tag
    let patch = UpdateExerciseProgram {
        fitness_goal_ids: Some(vec![]),
        ..Default::default()
    };
    service.update(created.id, owner, patch).await.unwrap().unwrap();
    let detail = service.get_by_id(created.id, owner).await.unwrap().unwrap();
    assert!(detail.fitness_goals.is_empty());
}

#[tokio::test]
async fn list_filters_by_difficulty_and_goal() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty_a = common::create_difficulty_level(&pool).await;
    let difficulty_b = common::create_difficulty_level(&pool).await;
    let goal = common::create_fitness_goal(&pool).await;
    let owner = common::create_user(&pool).await;

    let mut tagged = program_input("Tagged A", difficulty_a, Some(owner));
    tagged.fitness_goal_ids = vec![goal];
    let tagged = service.create(tagged).await.unwrap();
    let untagged = service
        .create(program_input("Untagged B", difficulty_b, Some(owner)))
        .await
        .unwrap();

    let filter = ProgramFilter {
        difficulty_level_id: Some(difficulty_a.to_string()),
        ..Default::default()
    };
    let listed = service.list(owner, &filter).await.unwrap();
    assert!(listed.iter().any(|p| p.program.id == tagged.id));
    assert!(listed.iter().all(|p| p.program.id != untagged.id));

    let filter = ProgramFilter {
        fitness_goal_id: Some(goal.to_string()),
        ..Default::default()
    };
    let listed = service.list(owner, &filter).await.unwrap();
    assert!(listed.iter().any(|p| p.program.id == tagged.id));
    assert!(listed.iter().all(|p| p.program.id != untagged.id));

    // Unparseable filter lists are ignored rather than rejected
    let filter = ProgramFilter {
        difficulty_level_id: Some("not,numbers".to_string()),
        ..Default::default()
    };
    let listed = service.list(owner, &filter).await.unwrap();
    assert!(listed.iter().any(|p| p.program.id == untagged.id));
}

#[tokio::test]
async fn system_programs_cannot_be_claimed_but_owned_ones_can_be_released() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let user = common::create_user(&pool).await;

    let system = service
        .create(program_input("Shared", difficulty, None))
        .await
        .unwrap();
    let patch = UpdateExerciseProgram {
        user_id: Some(Some(user)),
        ..Default::default()
    };
    let updated = service.update(system.id, user, patch).await.unwrap().unwrap();
    assert_eq!(updated.user_id, None, "system programs stay unowned");

    let owned = service
        .create(program_input("Mine", difficulty, Some(user)))
        .await
        .unwrap();
    let patch = UpdateExerciseProgram {
        user_id: Some(None),
        ..Default::default()
    };
    let updated = service.update(owned.id, user, patch).await.unwrap().unwrap();
    assert_eq!(updated.user_id, None, "owner released the program");
}

#[tokio::test]
async fn prescription_without_reps_or_duration_is_rejected() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = ProgramService::new(pool.clone());

    let difficulty = common::create_difficulty_level(&pool).await;
    let exercise = common::create_exercise(&pool).await;
    let owner = common::create_user(&pool).await;

    let mut input = program_input("Invalid", difficulty, Some(owner));
    input.exercise_ids = vec![PrescriptionInput {
        id: None,
        exercise_id: exercise,
        order: None,
        sets: 3,
        reps: None,
        duration: None,
        rest_duration: Some(60),
    }];

    match service.create(input).await {
        Err(ServiceError::Validation(_)) => {}
        other => panic!("expected validation error, got {:?}", other.map(|p| p.id)),
    }
}
