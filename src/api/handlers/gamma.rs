use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde_json::Value;

use crate::api::proxy::{
    validate_path_id, ProxyQuery, ProxyRoute, DEFAULT_TTL, PROFILE_TTL, TAGS_TTL,
};
use crate::errors::AppError;
use crate::AppState;

const MARKETS: ProxyRoute = ProxyRoute { name: "markets", resource: "markets", service: "Polymarket", ttl: DEFAULT_TTL };
const MARKET: ProxyRoute = ProxyRoute { name: "market", resource: "market", service: "Polymarket", ttl: DEFAULT_TTL };
const EVENTS: ProxyRoute = ProxyRoute { name: "events", resource: "events", service: "Polymarket", ttl: DEFAULT_TTL };
const EVENT: ProxyRoute = ProxyRoute { name: "event", resource: "event", service: "Polymarket", ttl: DEFAULT_TTL };
const SEARCH: ProxyRoute = ProxyRoute { name: "search", resource: "search results", service: "Gamma", ttl: DEFAULT_TTL };
const TAGS: ProxyRoute = ProxyRoute { name: "tags", resource: "tags", service: "Gamma", ttl: TAGS_TTL };
const PROFILE: ProxyRoute = ProxyRoute { name: "profile", resource: "profile", service: "Gamma", ttl: PROFILE_TTL };

/// Popular-first listing unless the caller says otherwise.
pub const MARKET_DEFAULTS: &[(&str, &str)] = &[
    ("order", "volume"),
    ("ascending", "false"),
    ("active", "true"),
    ("closed", "false"),
];

/// GET /api/polymarket/markets?endpoint=markets|events&...
pub async fn markets(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let endpoint = match q.get("endpoint").unwrap_or("markets") {
        "markets" => "markets",
        "events" => "events",
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid endpoint parameter: {other} (expected markets or events)"
            )))
        }
    };
    let query = q.forward_all(&["endpoint"], MARKET_DEFAULTS);
    MARKETS.respond(state.upstreams.gamma.get_raw(endpoint, &query).await)
}

/// GET /api/polymarket/markets/{id}
pub async fn market(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let id = validate_path_id(&id)?;
    MARKET.respond(state.upstreams.gamma.get_raw(&format!("markets/{id}"), &[]).await)
}

/// GET /api/polymarket/events: all params forwarded
pub async fn events(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    EVENTS.respond(state.upstreams.gamma.get_raw("events", &q.0).await)
}

/// GET /api/polymarket/events/{id}
pub async fn event(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let id = validate_path_id(&id)?;
    EVENT.respond(state.upstreams.gamma.get_raw(&format!("events/{id}"), &[]).await)
}

/// GET /api/polymarket/search?query=
pub async fn search(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let term = q.require("query")?;
    let query = vec![("query".to_string(), term)];
    SEARCH.respond(state.upstreams.gamma.get_raw("search", &query).await)
}

/// GET /api/polymarket/tags
pub async fn tags(State(state): State<AppState>) -> Result<Response, AppError> {
    TAGS.respond(state.upstreams.gamma.get_raw("tags", &[]).await)
}

/// GET /api/polymarket/profiles/{id}: `null` when the profile does not exist
pub async fn profile(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let id = validate_path_id(&id)?;
    let result = state.upstreams.gamma.profile(id).await;
    PROFILE.respond(result.map(|p| p.unwrap_or(Value::Null)))
}
