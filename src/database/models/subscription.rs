use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's enrollment in a subscription plan. Active while `end_date` is
/// in the future.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    pub id: i32,
    pub user_id: i32,
    pub subscription_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl UserSubscription {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date > now
    }
}
