use sqlx::PgPool;
use uuid::Uuid;

use crate::models::NotificationSettings;

use super::record_write;

/// Stored settings, or the defaults when the user never saved any.
pub async fn get_settings(pool: &PgPool, user_id: Uuid) -> anyhow::Result<NotificationSettings> {
    let settings = sqlx::query_as::<_, NotificationSettings>(
        "SELECT * FROM notification_settings WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(settings.unwrap_or_else(|| NotificationSettings::defaults(user_id)))
}

pub async fn save_settings(pool: &PgPool, settings: &NotificationSettings) -> anyhow::Result<NotificationSettings> {
    let saved = sqlx::query_as::<_, NotificationSettings>(
        r#"
        INSERT INTO notification_settings
            (user_id, large_trade_alerts, portfolio_updates, market_signals, daily_digest, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            large_trade_alerts = EXCLUDED.large_trade_alerts,
            portfolio_updates  = EXCLUDED.portfolio_updates,
            market_signals     = EXCLUDED.market_signals,
            daily_digest       = EXCLUDED.daily_digest,
            updated_at         = NOW()
        RETURNING *
        "#,
    )
    .bind(settings.user_id)
    .bind(settings.large_trade_alerts)
    .bind(settings.portfolio_updates)
    .bind(settings.market_signals)
    .bind(settings.daily_digest)
    .fetch_one(pool)
    .await?;

    record_write("notification_settings");
    Ok(saved)
}
