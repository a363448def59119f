use reqwest::Client;
use serde_json::Value;

use super::types::OrderBook;
use super::{build_url, fetch_json, fetch_typed, UpstreamError};

/// Live pricing and order books (CLOB API). Read-only; no order placement.
#[derive(Debug, Clone)]
pub struct ClobClient {
    http: Client,
    base_url: String,
}

impl ClobClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub async fn get_raw(&self, path: &str, query: &[(String, String)]) -> Result<Value, UpstreamError> {
        let url = build_url(&self.base_url, path, query)?;
        fetch_json(&self.http, url).await
    }

    /// Fetch order book for a specific token.
    pub async fn book(&self, token_id: &str) -> Result<OrderBook, UpstreamError> {
        let url = build_url(
            &self.base_url,
            "book",
            &[("token_id".to_string(), token_id.to_string())],
        )?;
        fetch_typed(&self.http, url).await
    }
}
