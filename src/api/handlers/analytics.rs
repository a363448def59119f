use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use rust_decimal::Decimal;

use crate::api::handlers::gamma::MARKET_DEFAULTS;
use crate::api::proxy::{cached_json, ProxyQuery, DEFAULT_TTL, LIVE_TTL};
use crate::errors::AppError;
use crate::intelligence::{build_feed, liquidity_depth, Confidence, MarketCard, SignalFilter, SignalSort};
use crate::models::normalize_wallet_address;
use crate::services::trader_service;
use crate::AppState;

/// GET /api/traders/{address}/summary: profile page metrics
pub async fn trader_summary(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Response, AppError> {
    let wallet = normalize_wallet_address(&address)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid wallet address: {address}")))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    let summary = trader_service::trader_summary(&state.upstreams, &wallet, now_ms).await;
    Ok(cached_json(summary, DEFAULT_TTL))
}

/// GET /api/analytics/book-depth?token_id=&range=
pub async fn book_depth(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let token_id = q.require("token_id")?;
    let range = match q.get("range") {
        None => Decimal::new(1, 1),
        Some(raw) => Decimal::from_str(raw)
            .ok()
            .filter(|r| *r > Decimal::ZERO && *r <= Decimal::ONE)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid range parameter: {raw}")))?,
    };

    let book = state
        .upstreams
        .clob
        .book(&token_id)
        .await
        .map_err(|e| AppError::from_upstream("CLOB", "order book", e))?;

    Ok(cached_json(liquidity_depth(&book, range), LIVE_TTL))
}

/// GET /api/analytics/markets: market browser cards
pub async fn market_cards(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let mut query = q.pick(&["limit", "offset", "tag_id"]);
    for (key, value) in MARKET_DEFAULTS {
        query.push((key.to_string(), q.get(key).unwrap_or(*value).to_string()));
    }

    let markets = state
        .upstreams
        .gamma
        .markets(&query)
        .await
        .map_err(|e| AppError::from_upstream("Polymarket", "markets", e))?;

    let cards: Vec<MarketCard> = markets.iter().map(MarketCard::from_market).collect();
    Ok(cached_json(cards, DEFAULT_TTL))
}

fn signal_filter(q: &ProxyQuery) -> Result<SignalFilter, AppError> {
    let confidence = match q.get("confidence") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => Some(
            Confidence::from_param(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid confidence parameter: {raw}")))?,
        ),
    };
    let min_size = q
        .get("minSize")
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid minSize parameter: {raw}")))
        })
        .transpose()?;
    let sort = q
        .get("sortBy")
        .map(|raw| {
            SignalSort::from_param(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid sortBy parameter: {raw}")))
        })
        .transpose()?
        .unwrap_or_default();

    Ok(SignalFilter {
        confidence,
        min_size,
        whales_only: q.get("whalesOnly").is_some_and(|v| v == "true" || v == "1"),
        sort,
    })
}

/// GET /api/analytics/signals?confidence=&minSize=&whalesOnly=&sortBy=
pub async fn insider_signals(State(state): State<AppState>, Query(q): Query<ProxyQuery>) -> Result<Response, AppError> {
    let filter = signal_filter(&q)?;

    let signals = trader_service::insider_signals(&state.upstreams)
        .await
        .map_err(|e| AppError::from_upstream("Data", "leaderboard", e))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    Ok(cached_json(build_feed(signals, &filter, now_ms), LIVE_TTL))
}
