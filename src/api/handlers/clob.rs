use axum::extract::{Query, State};
use axum::response::Response;

use crate::api::proxy::{ProxyQuery, ProxyRoute, DEFAULT_TTL, LIVE_TTL};
use crate::errors::AppError;
use crate::AppState;

const BOOK: ProxyRoute = ProxyRoute { name: "book", resource: "order book", service: "CLOB", ttl: LIVE_TTL };
const PRICE: ProxyRoute = ProxyRoute { name: "price", resource: "price", service: "CLOB", ttl: LIVE_TTL };
const MIDPOINT: ProxyRoute = ProxyRoute { name: "midpoint", resource: "midpoint", service: "CLOB", ttl: LIVE_TTL };
const SPREAD: ProxyRoute = ProxyRoute { name: "spread", resource: "spread", service: "CLOB", ttl: LIVE_TTL };
const PRICE_HISTORY: ProxyRoute = ProxyRoute {
    name: "prices-history",
    resource: "price history",
    service: "CLOB",
    ttl: DEFAULT_TTL,
};

/// GET /api/polymarket/book?token_id=
pub async fn book(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let query = vec![("token_id".to_string(), token_id)];
    BOOK.respond(state.upstreams.clob.get_raw("book", &query).await)
}

/// GET /api/polymarket/price?token_id=&side=
pub async fn price(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let side = q.require("side")?;
    let query = vec![("token_id".to_string(), token_id), ("side".to_string(), side)];
    PRICE.respond(state.upstreams.clob.get_raw("price", &query).await)
}

/// GET /api/polymarket/midpoint?token_id=
pub async fn midpoint(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let query = vec![("token_id".to_string(), token_id)];
    MIDPOINT.respond(state.upstreams.clob.get_raw("midpoint", &query).await)
}

/// GET /api/polymarket/spread?token_id=
pub async fn spread(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let query = vec![("token_id".to_string(), token_id)];
    SPREAD.respond(state.upstreams.clob.get_raw("spread", &query).await)
}

/// GET /api/polymarket/prices-history?token_id=&interval=&fidelity=&startTs=&endTs=
pub async fn prices_history(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let mut query = vec![("token_id".to_string(), token_id)];
    query.extend(q.pick_or(&[("interval", "1w"), ("fidelity", "60")]));
    query.extend(q.pick(&["startTs", "endTs"]));
    PRICE_HISTORY.respond(state.upstreams.clob.get_raw("prices-history", &query).await)
}
