use reqwest::Client;
use serde_json::Value;

use super::types::Market;
use super::{build_url, fetch_json, fetch_typed, UpstreamError};

/// Market and event metadata (Gamma API).
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

impl GammaClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    /// Pass-through GET of any Gamma resource.
    pub async fn get_raw(&self, path: &str, query: &[(String, String)]) -> Result<Value, UpstreamError> {
        let url = build_url(&self.base_url, path, query)?;
        fetch_json(&self.http, url).await
    }

    /// Fetch markets with the given filters (`active`, `closed`, `order`, `limit`, ...).
    pub async fn markets(&self, query: &[(String, String)]) -> Result<Vec<Market>, UpstreamError> {
        let url = build_url(&self.base_url, "markets", query)?;
        fetch_typed(&self.http, url).await
    }

    /// Public profile by wallet or username. A 404 means "no profile", not an error.
    pub async fn profile(&self, address_or_username: &str) -> Result<Option<Value>, UpstreamError> {
        match self.get_raw(&format!("profiles/{address_or_username}"), &[]).await {
            Ok(profile) => Ok(Some(profile)),
            Err(UpstreamError::Status(status)) if status == reqwest::StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }
}
