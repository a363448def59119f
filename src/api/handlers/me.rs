use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::db::profile_repo::ProfileUpdate;
use crate::db::{follow_repo, notification_repo, profile_repo, tracked_wallet_repo};
use crate::errors::AppError;
use crate::intelligence::TraderSummary;
use crate::models::{normalize_wallet_address, FollowedTrader, NotificationSettings, Profile, TrackedWallet};
use crate::services::trader_service::{self, LiveWallet};
use crate::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Omitted keys are left alone; `null` or a blank string clears the field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "clearable")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub telegram_handle: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub polymarket_wallet: Option<Option<String>>,
}

fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())))
}

#[derive(Debug, Deserialize)]
pub struct LinkWalletRequest {
    pub wallet_address: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub trader_address: String,
    pub trader_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackWalletRequest {
    pub wallet_address: String,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTrackedRequest {
    pub alerts_enabled: Option<bool>,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationSettingsRequest {
    pub large_trade_alerts: bool,
    pub portfolio_updates: bool,
    pub market_signals: bool,
    pub daily_digest: bool,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub profile: Profile,
    pub followed_count: i64,
    pub tracked_count: i64,
    /// Present only when a wallet is linked.
    pub summary: Option<TraderSummary>,
}

fn valid_wallet(raw: &str) -> Result<String, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest("Wallet address is required".into()));
    }
    normalize_wallet_address(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid wallet address: {}", raw.trim())))
}

/// Trims and drops blank optional text fields.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /api/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(profile_repo::get_or_create(&state.db, user_id).await?))
}

/// PUT /api/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let polymarket_wallet = match body.polymarket_wallet {
        Some(Some(raw)) => Some(Some(valid_wallet(&raw)?)),
        other => other,
    };

    let update = ProfileUpdate {
        display_name: body.display_name,
        telegram_handle: body.telegram_handle,
        polymarket_wallet,
    };

    let profile = profile_repo::update_profile(&state.db, user_id, &update).await?;
    tracing::info!(user = %user_id, "Profile updated");
    Ok(Json(profile))
}

/// PUT /api/me/wallet
pub async fn link_wallet(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<LinkWalletRequest>,
) -> Result<Json<Profile>, AppError> {
    let wallet = valid_wallet(&body.wallet_address)?;
    let profile = profile_repo::set_wallet(&state.db, user_id, Some(&wallet)).await?;
    tracing::info!(user = %user_id, wallet = %wallet, "Wallet linked");
    Ok(Json(profile))
}

/// DELETE /api/me/wallet
pub async fn unlink_wallet(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Profile>, AppError> {
    let profile = profile_repo::set_wallet(&state.db, user_id, None).await?;
    tracing::info!(user = %user_id, "Wallet unlinked");
    Ok(Json(profile))
}

// ---------------------------------------------------------------------------
// Followed traders
// ---------------------------------------------------------------------------

/// GET /api/me/followed
pub async fn list_followed(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<FollowedTrader>>, AppError> {
    Ok(Json(follow_repo::list_followed(&state.db, user_id).await?))
}

/// POST /api/me/followed
pub async fn follow(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<FollowRequest>,
) -> Result<(StatusCode, Json<FollowedTrader>), AppError> {
    let address = valid_wallet(&body.trader_address)?;
    let trader = follow_repo::follow(&state.db, user_id, &address, non_blank(body.trader_name.as_deref())).await?;
    Ok((StatusCode::CREATED, Json(trader)))
}

/// DELETE /api/me/followed/{address}
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(address): Path<String>,
) -> Result<StatusCode, AppError> {
    let address = valid_wallet(&address)?;
    if !follow_repo::unfollow(&state.db, user_id, &address).await? {
        return Err(AppError::NotFound("trader not followed".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tracked wallets
// ---------------------------------------------------------------------------

/// GET /api/me/tracked-wallets: newest first
pub async fn list_tracked(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<TrackedWallet>>, AppError> {
    Ok(Json(tracked_wallet_repo::list_tracked(&state.db, user_id).await?))
}

/// POST /api/me/tracked-wallets
pub async fn track_wallet(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<TrackWalletRequest>,
) -> Result<(StatusCode, Json<TrackedWallet>), AppError> {
    let address = valid_wallet(&body.wallet_address)?;
    let wallet =
        tracked_wallet_repo::add_tracked(&state.db, user_id, &address, non_blank(body.label.as_deref())).await?;
    tracing::info!(user = %user_id, wallet = %address, "Wallet tracked");
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// PATCH /api/me/tracked-wallets/{id}
pub async fn update_tracked(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTrackedRequest>,
) -> Result<Json<TrackedWallet>, AppError> {
    let wallet = tracked_wallet_repo::update_tracked(
        &state.db,
        user_id,
        id,
        body.alerts_enabled,
        non_blank(body.label.as_deref()),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("tracked wallet not found".into()))?;

    Ok(Json(wallet))
}

/// DELETE /api/me/tracked-wallets/{id}
pub async fn untrack_wallet(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !tracked_wallet_repo::remove_tracked(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("tracked wallet not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me/tracked-wallets/live: leaderboard standing and latest trades per wallet
pub async fn live_tracked(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<LiveWallet>>, AppError> {
    let wallets = tracked_wallet_repo::list_tracked(&state.db, user_id).await?;
    Ok(Json(trader_service::live_wallets(&state.upstreams, wallets).await))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// GET /api/me/notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<NotificationSettings>, AppError> {
    Ok(Json(notification_repo::get_settings(&state.db, user_id).await?))
}

/// PUT /api/me/notifications
pub async fn save_notifications(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<NotificationSettingsRequest>,
) -> Result<Json<NotificationSettings>, AppError> {
    let settings = NotificationSettings {
        user_id,
        large_trade_alerts: body.large_trade_alerts,
        portfolio_updates: body.portfolio_updates,
        market_signals: body.market_signals,
        daily_digest: body.daily_digest,
        updated_at: None,
    };
    Ok(Json(notification_repo::save_settings(&state.db, &settings).await?))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/me/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Dashboard>, AppError> {
    let profile = profile_repo::get_or_create(&state.db, user_id).await?;
    let followed_count = follow_repo::count_followed(&state.db, user_id).await?;
    let tracked_count = tracked_wallet_repo::count_tracked(&state.db, user_id).await?;

    let summary = match profile.polymarket_wallet.as_deref() {
        Some(wallet) => {
            let now_ms = chrono::Utc::now().timestamp_millis();
            Some(trader_service::trader_summary(&state.upstreams, wallet, now_ms).await)
        }
        None => None,
    };

    Ok(Json(Dashboard {
        profile,
        followed_count,
        tracked_count,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_request_separates_omitted_from_cleared() {
        let body: UpdateProfileRequest =
            serde_json::from_str(r#"{"display_name":"  Alice ","telegram_handle":null,"polymarket_wallet":"  "}"#)
                .unwrap();
        assert_eq!(body.display_name, Some(Some("Alice".to_string())));
        assert_eq!(body.telegram_handle, Some(None));
        assert_eq!(body.polymarket_wallet, Some(None));

        let body: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(body.display_name, None);
        assert_eq!(body.telegram_handle, None);
    }
}
