use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NotificationSettings {
    pub user_id: Uuid,
    pub large_trade_alerts: bool,
    pub portfolio_updates: bool,
    pub market_signals: bool,
    pub daily_digest: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationSettings {
    /// Settings shown before the user has saved anything.
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            large_trade_alerts: true,
            portfolio_updates: true,
            market_signals: false,
            daily_digest: false,
            updated_at: None,
        }
    }
}
