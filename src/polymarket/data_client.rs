use reqwest::Client;
use serde_json::Value;

use super::types::{LeaderboardTrader, UserPosition, UserTrade};
use super::{build_url, fetch_json, fetch_typed, UpstreamError};

/// Leaderboard, positions, trades and activity (Data API).
#[derive(Debug, Clone)]
pub struct DataClient {
    http: Client,
    base_url: String,
}

impl DataClient {
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

    pub async fn leaderboard(&self, query: &[(String, String)]) -> Result<Vec<LeaderboardTrader>, UpstreamError> {
        let url = build_url(&self.base_url, "v1/leaderboard", query)?;
        fetch_typed(&self.http, url).await
    }

    /// Leaderboard row for a single wallet, if it is ranked at all.
    pub async fn leaderboard_entry(&self, wallet: &str) -> Result<Option<LeaderboardTrader>, UpstreamError> {
        let query = vec![
            ("user".to_string(), wallet.to_string()),
            ("limit".to_string(), "1".to_string()),
        ];
        Ok(self.leaderboard(&query).await?.into_iter().next())
    }

    pub async fn positions(&self, query: &[(String, String)]) -> Result<Vec<UserPosition>, UpstreamError> {
        let url = build_url(&self.base_url, "positions", query)?;
        fetch_typed(&self.http, url).await
    }

    pub async fn trades(&self, query: &[(String, String)]) -> Result<Vec<UserTrade>, UpstreamError> {
        let url = build_url(&self.base_url, "trades", query)?;
        fetch_typed(&self.http, url).await
    }

    /// Most recent trades for one wallet.
    pub async fn recent_trades(&self, wallet: &str, limit: u32) -> Result<Vec<UserTrade>, UpstreamError> {
        let query = vec![
            ("user".to_string(), wallet.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        self.trades(&query).await
    }
}
