use sqlx::PgPool;
use uuid::Uuid;

use crate::models::FollowedTrader;

use super::record_write;

pub async fn list_followed(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FollowedTrader>> {
    let traders = sqlx::query_as::<_, FollowedTrader>(
        "SELECT * FROM followed_traders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(traders)
}

/// Idempotent: following twice keeps one row and refreshes the name if given.
pub async fn follow(
    pool: &PgPool,
    user_id: Uuid,
    trader_address: &str,
    trader_name: Option<&str>,
) -> anyhow::Result<FollowedTrader> {
    let trader = sqlx::query_as::<_, FollowedTrader>(
        r#"
        INSERT INTO followed_traders (user_id, trader_address, trader_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, trader_address) DO UPDATE
            SET trader_name = COALESCE(EXCLUDED.trader_name, followed_traders.trader_name)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(trader_address)
    .bind(trader_name)
    .fetch_one(pool)
    .await?;

    record_write("followed_traders");
    Ok(trader)
}

/// Returns false when the trader was not followed.
pub async fn unfollow(pool: &PgPool, user_id: Uuid, trader_address: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM followed_traders WHERE user_id = $1 AND trader_address = $2")
        .bind(user_id)
        .bind(trader_address)
        .execute(pool)
        .await?;

    let removed = result.rows_affected() > 0;
    if removed {
        record_write("followed_traders");
    }
    Ok(removed)
}

pub async fn count_followed(pool: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM followed_traders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
