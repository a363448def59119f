use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

use super::record_write;

/// Fields a user may edit: `None` leaves the stored value unchanged,
/// `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub display_name: Option<Option<String>>,
    pub telegram_handle: Option<Option<String>>,
    pub polymarket_wallet: Option<Option<String>>,
}

fn new_value(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

/// Load the caller's profile, creating an empty one on first access.
pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Profile> {
    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(user_id)
        .execute(pool)
        .await?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(profile)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, display_name, telegram_handle, polymarket_wallet)
        VALUES ($1, $3, $5, $7)
        ON CONFLICT (id) DO UPDATE SET
            display_name      = CASE WHEN $2 THEN $3 ELSE profiles.display_name END,
            telegram_handle   = CASE WHEN $4 THEN $5 ELSE profiles.telegram_handle END,
            polymarket_wallet = CASE WHEN $6 THEN $7 ELSE profiles.polymarket_wallet END,
            updated_at        = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(update.display_name.is_some())
    .bind(new_value(&update.display_name))
    .bind(update.telegram_handle.is_some())
    .bind(new_value(&update.telegram_handle))
    .bind(update.polymarket_wallet.is_some())
    .bind(new_value(&update.polymarket_wallet))
    .fetch_one(pool)
    .await?;

    record_write("profiles");
    Ok(profile)
}

/// Link (`Some`) or unlink (`None`) the dashboard wallet.
pub async fn set_wallet(pool: &PgPool, user_id: Uuid, wallet: Option<&str>) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, polymarket_wallet)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET polymarket_wallet = $2, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(wallet)
    .fetch_one(pool)
    .await?;

    record_write("profiles");
    Ok(profile)
}
