use axum::extract::{Query, State};
use axum::response::Response;

use crate::api::proxy::{ProxyQuery, ProxyRoute, DEFAULT_TTL};
use crate::errors::AppError;
use crate::intelligence::{LeaderboardCategory, LeaderboardOrder, TimePeriod};
use crate::polymarket::QueryPairs;
use crate::AppState;

const LEADERBOARD: ProxyRoute = ProxyRoute { name: "leaderboard", resource: "leaderboard", service: "Data", ttl: DEFAULT_TTL };
const POSITIONS: ProxyRoute = ProxyRoute { name: "positions", resource: "positions", service: "Data", ttl: DEFAULT_TTL };
const TRADES: ProxyRoute = ProxyRoute { name: "trades", resource: "trades", service: "Data", ttl: DEFAULT_TTL };
const ACTIVITY: ProxyRoute = ProxyRoute { name: "activity", resource: "activity", service: "Data", ttl: DEFAULT_TTL };
const HOLDERS: ProxyRoute = ProxyRoute { name: "holders", resource: "holders", service: "Data", ttl: DEFAULT_TTL };
const VALUE: ProxyRoute = ProxyRoute { name: "value", resource: "portfolio value", service: "Data", ttl: DEFAULT_TTL };
const CLOSED_POSITIONS: ProxyRoute = ProxyRoute {
    name: "closed-positions",
    resource: "closed positions",
    service: "Data",
    ttl: DEFAULT_TTL,
};

fn parse_param<T>(q: &ProxyQuery, key: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>, AppError> {
    match q.get(key) {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {key} parameter: {raw}"))),
    }
}

/// Leaderboard query with defaults applied and UI aliases mapped to API values.
pub fn leaderboard_query(q: &ProxyQuery) -> Result<QueryPairs, AppError> {
    let category = parse_param(q, "category", LeaderboardCategory::from_param)?.unwrap_or_default();
    let period = parse_param(q, "timePeriod", TimePeriod::from_param)?.unwrap_or_default();
    let order = parse_param(q, "orderBy", LeaderboardOrder::from_param)?.unwrap_or_default();

    let mut query = vec![
        ("category".to_string(), category.as_str().to_string()),
        ("timePeriod".to_string(), period.as_str().to_string()),
        ("orderBy".to_string(), order.as_str().to_string()),
    ];
    query.extend(q.pick_or(&[("limit", "24"), ("offset", "0")]));
    query.extend(q.pick(&["user", "userName"]));
    Ok(query)
}

/// GET /api/polymarket/leaderboard?category=&timePeriod=&orderBy=&limit=&offset=&user=&userName=
pub async fn leaderboard(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let query = leaderboard_query(&q)?;
    LEADERBOARD.respond(state.upstreams.data.get_raw("v1/leaderboard", &query).await)
}

/// GET /api/polymarket/positions?user=
pub async fn positions(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let user = q.require("user")?;
    let mut query = vec![("user".to_string(), user)];
    query.extend(q.pick_or(&[
        ("limit", "100"),
        ("offset", "0"),
        ("sortBy", "CASHPNL"),
        ("sortDirection", "DESC"),
    ]));
    query.extend(q.pick(&["market", "eventId", "sizeThreshold", "redeemable", "mergeable", "title"]));
    POSITIONS.respond(state.upstreams.data.get_raw("positions", &query).await)
}

/// GET /api/polymarket/trades
pub async fn trades(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let mut query = q.pick(&["user", "market", "eventId"]);
    query.extend(q.pick_or(&[("limit", "100"), ("offset", "0")]));
    query.extend(q.pick(&["side", "filterType", "filterAmount", "takerOnly"]));
    TRADES.respond(state.upstreams.data.get_raw("trades", &query).await)
}

/// GET /api/polymarket/activity?user=
pub async fn activity(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let user = q.require("user")?;
    let mut query = vec![("user".to_string(), user)];
    query.extend(q.pick(&["limit", "offset"]));
    ACTIVITY.respond(state.upstreams.data.get_raw("activity", &query).await)
}

/// GET /api/polymarket/holders?market=<condition id>
pub async fn holders(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let market = q.require("market")?;
    let mut query = vec![("market".to_string(), market)];
    query.extend(q.pick(&["limit"]));
    HOLDERS.respond(state.upstreams.data.get_raw("holders", &query).await)
}

/// GET /api/polymarket/value?user=
pub async fn value(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let user = q.require("user")?;
    let query = vec![("user".to_string(), user)];
    VALUE.respond(state.upstreams.data.get_raw("value", &query).await)
}

/// GET /api/polymarket/closed-positions?user=
pub async fn closed_positions(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let user = q.require("user")?;
    let mut query = vec![("user".to_string(), user)];
    query.extend(q.pick(&["limit", "offset"]));
    CLOSED_POSITIONS.respond(state.upstreams.data.get_raw("closed-positions", &query).await)
}
