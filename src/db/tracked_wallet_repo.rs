use sqlx::PgPool;
use uuid::Uuid;

use crate::models::TrackedWallet;

use super::record_write;

pub async fn list_tracked(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<TrackedWallet>> {
    let wallets = sqlx::query_as::<_, TrackedWallet>(
        "SELECT * FROM tracked_wallets WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(wallets)
}

/// Track a wallet with alerts on. Re-adding an address keeps the existing row.
pub async fn add_tracked(
    pool: &PgPool,
    user_id: Uuid,
    wallet_address: &str,
    label: Option<&str>,
) -> anyhow::Result<TrackedWallet> {
    let wallet = sqlx::query_as::<_, TrackedWallet>(
        r#"
        INSERT INTO tracked_wallets (user_id, wallet_address, label, alerts_enabled)
        VALUES ($1, $2, $3, true)
        ON CONFLICT (user_id, wallet_address) DO UPDATE
            SET label = COALESCE(EXCLUDED.label, tracked_wallets.label)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(wallet_address)
    .bind(label)
    .fetch_one(pool)
    .await?;

    record_write("tracked_wallets");
    Ok(wallet)
}

/// Returns `None` when `id` does not belong to `user_id`.
pub async fn update_tracked(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    alerts_enabled: Option<bool>,
    label: Option<&str>,
) -> anyhow::Result<Option<TrackedWallet>> {
    let wallet = sqlx::query_as::<_, TrackedWallet>(
        r#"
        UPDATE tracked_wallets
        SET alerts_enabled = COALESCE($3, alerts_enabled),
            label          = COALESCE($4, label)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(alerts_enabled)
    .bind(label)
    .fetch_optional(pool)
    .await?;

    if wallet.is_some() {
        record_write("tracked_wallets");
    }
    Ok(wallet)
}

pub async fn remove_tracked(pool: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM tracked_wallets WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    let removed = result.rows_affected() > 0;
    if removed {
        record_write("tracked_wallets");
    }
    Ok(removed)
}

pub async fn count_tracked(pool: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracked_wallets WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
