use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per authenticated user. `id` is the auth provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub telegram_handle: Option<String>,
    /// Linked wallet used to personalize the dashboard.
    pub polymarket_wallet: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
