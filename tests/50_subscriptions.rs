//! Subscription enrollment rules. Every test skips cleanly when
//! DATABASE_URL is not configured.

mod common;

use chrono::{Duration, TimeZone, Utc};

use fittrack_api_rust::services::user_subscription_service::{
    CreateUserSubscription, UpdateUserSubscription,
};
use fittrack_api_rust::services::{ServiceError, UserSubscriptionService};

#[tokio::test]
async fn overlapping_active_subscription_conflicts() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = UserSubscriptionService::new(pool.clone());

    let user = common::create_user(&pool).await;
    let plan = common::create_subscription_plan(&pool).await;

    // An already-lapsed subscription does not block anything
    service
        .create(
            user,
            CreateUserSubscription {
                subscription_id: plan,
                start_date: Some(Utc::now() - Duration::days(60)),
                end_date: Utc::now() - Duration::days(30),
            },
        )
        .await
        .unwrap();

    let active = service
        .create(
            user,
            CreateUserSubscription {
                subscription_id: plan,
                start_date: None,
                end_date: Utc::now() + Duration::days(30),
            },
        )
        .await
        .unwrap();
    assert!(active.is_active_at(Utc::now()));

    // A second active enrollment in the same plan is a conflict
    match service
        .create(
            user,
            CreateUserSubscription {
                subscription_id: plan,
                start_date: None,
                end_date: Utc::now() + Duration::days(90),
            },
        )
        .await
    {
        Err(ServiceError::Conflict(_)) => {}
        other => panic!("expected Conflict, got {:?}", other.map(|s| s.id)),
    }

    // A different plan is unaffected
    let other_plan = common::create_subscription_plan(&pool).await;
    service
        .create(
            user,
            CreateUserSubscription {
                subscription_id: other_plan,
                start_date: None,
                end_date: Utc::now() + Duration::days(30),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn subscriptions_are_scoped_to_their_user() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let service = UserSubscriptionService::new(pool.clone());

    let owner = common::create_user(&pool).await;
    let stranger = common::create_user(&pool).await;
    let plan = common::create_subscription_plan(&pool).await;

    let created = service
        .create(
            owner,
            CreateUserSubscription {
                subscription_id: plan,
                start_date: None,
                end_date: Utc::now() + Duration::days(30),
            },
        )
        .await
        .unwrap();

    assert!(service.get_by_id(created.id, owner).await.unwrap().is_some());
    assert!(service.get_by_id(created.id, stranger).await.unwrap().is_none());
    assert!(!service.delete(created.id, stranger).await.unwrap());

    // Whole seconds so the value round-trips the database exactly
    let extended = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
    let updated = service
        .update(
            created.id,
            owner,
            UpdateUserSubscription {
                end_date: Some(extended),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.end_date, extended);

    assert!(service.delete(created.id, owner).await.unwrap());
    assert!(service.get_by_user(owner).await.unwrap().is_empty());
}
