use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FollowedTrader {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trader_address: String,
    pub trader_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
