//! User enrollment in subscription plans. Billing is out of scope; the one
//! business rule here is that a user cannot hold two overlapping active
//! subscriptions to the same plan.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::subscription::UserSubscription;

use super::{ServiceError, ServiceResult};

const COLUMNS: &str = "id, user_id, subscription_id, start_date, end_date";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserSubscription {
    pub subscription_id: i32,
    /// Defaults to now when absent
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserSubscription {
    pub subscription_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

pub struct UserSubscriptionService {
    pool: PgPool,
}

impl UserSubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_user(&self, user_id: i32) -> ServiceResult<Vec<UserSubscription>> {
        let rows = sqlx::query_as::<_, UserSubscription>(&format!(
            "SELECT {COLUMNS} FROM user_subscriptions WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32, user_id: i32) -> ServiceResult<Option<UserSubscription>> {
        let row = sqlx::query_as::<_, UserSubscription>(&format!(
            "SELECT {COLUMNS} FROM user_subscriptions WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Enroll the user. Conflicts when an active subscription to the same
    /// plan already exists; a lapsed one does not block re-enrollment.
    pub async fn create(
        &self,
        user_id: i32,
        data: CreateUserSubscription,
    ) -> ServiceResult<UserSubscription> {
        let existing = sqlx::query_as::<_, UserSubscription>(&format!(
            "SELECT {COLUMNS} FROM user_subscriptions
             WHERE user_id = $1 AND subscription_id = $2"
        ))
        .bind(user_id)
        .bind(data.subscription_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        if existing.iter().any(|sub| sub.is_active_at(now)) {
            return Err(ServiceError::Conflict(
                "User already has an active subscription of this type".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, UserSubscription>(&format!(
            "INSERT INTO user_subscriptions (user_id, subscription_id, start_date, end_date)
             VALUES ($1, $2, COALESCE($3, now()), $4)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(data.subscription_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        data: UpdateUserSubscription,
    ) -> ServiceResult<Option<UserSubscription>> {
        let row = sqlx::query_as::<_, UserSubscription>(&format!(
            "UPDATE user_subscriptions
             SET subscription_id = COALESCE($3, subscription_id),
                 start_date = COALESCE($4, start_date),
                 end_date = COALESCE($5, end_date)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(data.subscription_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM user_subscriptions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
