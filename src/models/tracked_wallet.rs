use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A wallet a user watches on the wallet tracker page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackedWallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_address: String,
    pub label: Option<String>,
    pub alerts_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Validate an EVM address (`0x` + 40 hex chars) and return it lowercased.
pub fn normalize_wallet_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("0x{}", hex.to_ascii_lowercase()))
    } else {
        None
    }
}
