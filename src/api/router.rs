use axum::middleware;
use axum::routing::{get, patch, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_user;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes: no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Polymarket proxy: GET only, upstream JSON passed through
    let proxy = Router::new()
        // CLOB
        .route("/api/polymarket/book", get(handlers::clob::book))
        .route("/api/polymarket/price", get(handlers::clob::price))
        .route("/api/polymarket/midpoint", get(handlers::clob::midpoint))
        .route("/api/polymarket/spread", get(handlers::clob::spread))
        .route("/api/polymarket/prices-history", get(handlers::clob::prices_history))
        // Gamma
        .route("/api/polymarket/markets", get(handlers::gamma::markets))
        .route("/api/polymarket/markets/:id", get(handlers::gamma::market))
        .route("/api/polymarket/events", get(handlers::gamma::events))
        .route("/api/polymarket/events/:id", get(handlers::gamma::event))
        .route("/api/polymarket/search", get(handlers::gamma::search))
        .route("/api/polymarket/tags", get(handlers::gamma::tags))
        .route("/api/polymarket/profiles/:id", get(handlers::gamma::profile))
        // Data
        .route("/api/polymarket/leaderboard", get(handlers::data::leaderboard))
        .route("/api/polymarket/positions", get(handlers::data::positions))
        .route("/api/polymarket/trades", get(handlers::data::trades))
        .route("/api/polymarket/activity", get(handlers::data::activity))
        .route("/api/polymarket/holders", get(handlers::data::holders))
        .route("/api/polymarket/value", get(handlers::data::value))
        .route("/api/polymarket/closed-positions", get(handlers::data::closed_positions));

    // Derived analytics over upstream data
    let analytics = Router::new()
        .route("/api/traders/:address/summary", get(handlers::analytics::trader_summary))
        .route("/api/analytics/book-depth", get(handlers::analytics::book_depth))
        .route("/api/analytics/markets", get(handlers::analytics::market_cards))
        .route("/api/analytics/signals", get(handlers::analytics::insider_signals));

    // Per-user state: requires an authenticated user
    let me = Router::new()
        .route("/api/me/profile", get(handlers::me::get_profile).put(handlers::me::update_profile))
        .route("/api/me/wallet", put(handlers::me::link_wallet).delete(handlers::me::unlink_wallet))
        .route("/api/me/followed", get(handlers::me::list_followed).post(handlers::me::follow))
        .route("/api/me/followed/:address", axum::routing::delete(handlers::me::unfollow))
        .route("/api/me/tracked-wallets", get(handlers::me::list_tracked).post(handlers::me::track_wallet))
        .route("/api/me/tracked-wallets/live", get(handlers::me::live_tracked))
        .route(
            "/api/me/tracked-wallets/:id",
            patch(handlers::me::update_tracked).delete(handlers::me::untrack_wallet),
        )
        .route(
            "/api/me/notifications",
            get(handlers::me::get_notifications).put(handlers::me::save_notifications),
        )
        .route("/api/me/dashboard", get(handlers::me::dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), require_user));

    // Browser dashboard calls the API cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(proxy)
        .merge(analytics)
        .merge(me)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
