pub mod clob_client;
pub mod data_client;
pub mod gamma_client;
pub mod types;

use std::time::Instant;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use clob_client::ClobClient;
pub use data_client::DataClient;
pub use gamma_client::GammaClient;
pub use types::{
    LeaderboardTrader, Market, OrderBook, OrderBookEntry, Side, Tag, Timestamp, UserPosition,
    UserTrade,
};

/// Query parameters in forwarding order.
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid upstream response: {0}")]
    Decode(String),

    #[error("invalid upstream url: {0}")]
    Url(String),
}

/// The three Polymarket services behind one shared connection pool.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub gamma: GammaClient,
    pub clob: ClobClient,
    pub data: DataClient,
}

impl Upstreams {
    pub fn new(http: Client, gamma_base: &str, clob_base: &str, data_base: &str) -> Self {
        Self {
            gamma: GammaClient::new(http.clone(), gamma_base),
            clob: ClobClient::new(http.clone(), clob_base),
            data: DataClient::new(http, data_base),
        }
    }
}

/// Join `base` and `path`, then append `query` in order.
pub(crate) fn build_url(base: &str, path: &str, query: &[(String, String)]) -> Result<Url, UpstreamError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| UpstreamError::Url(format!("{raw}: {e}")))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Single GET returning the upstream JSON body untouched.
pub(crate) async fn fetch_json(http: &Client, url: Url) -> Result<Value, UpstreamError> {
    let started = Instant::now();
    let path = url.path().to_string();

    let resp = http
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = resp.status();
    metrics::histogram!("upstream_latency_seconds", "path" => path.clone())
        .record(started.elapsed().as_secs_f64());

    if !status.is_success() {
        tracing::warn!(path = %path, status = status.as_u16(), "Upstream returned error status");
        return Err(UpstreamError::Status(status));
    }

    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Like [`fetch_json`], decoding into `T`.
pub(crate) async fn fetch_typed<T: DeserializeOwned>(http: &Client, url: Url) -> Result<T, UpstreamError> {
    let value = fetch_json(http, url).await?;
    serde_json::from_value(value).map_err(|e| UpstreamError::Decode(e.to_string()))
}
