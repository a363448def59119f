use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

/// Number, numeric string, or null/missing → f64 (0.0 when absent or unparseable).
fn de_f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// String or number → Option<String>.
fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    de_opt_string(d).map(Option::unwrap_or_default)
}

fn de_bool_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn de_side<'de, D: Deserializer<'de>>(d: D) -> Result<Side, D::Error> {
    let raw = de_opt_string(d)?;
    Ok(raw.as_deref().and_then(Side::from_api_str).unwrap_or(Side::Buy))
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

impl Side {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "0" => Some(Side::Buy),
            "SELL" | "1" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Timestamp: seconds, milliseconds, or ISO string depending on endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Numeric(f64),
    Text(String),
    #[default]
    Missing,
}

impl From<f64> for Timestamp {
    fn from(v: f64) -> Self {
        Timestamp::Numeric(v)
    }
}

impl From<i64> for Timestamp {
    fn from(v: i64) -> Self {
        Timestamp::Numeric(v as f64)
    }
}

impl From<&str> for Timestamp {
    fn from(v: &str) -> Self {
        Timestamp::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Market (Gamma API)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Tag {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub label: String,
    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub question: String,
    #[serde(default, deserialize_with = "de_string")]
    pub condition_id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "de_bool_lenient")]
    pub active: bool,
    #[serde(default, deserialize_with = "de_bool_lenient")]
    pub closed: bool,
    #[serde(default, deserialize_with = "de_bool_lenient")]
    pub archived: bool,
    /// Usually a stringified JSON array (`"[\"Yes\",\"No\"]"`), occasionally a real array.
    #[serde(default)]
    pub outcomes: Option<Value>,
    #[serde(default)]
    pub outcome_prices: Option<Value>,
    #[serde(default)]
    pub clob_token_ids: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub volume_num: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub volume24hr: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub liquidity: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub liquidity_num: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub best_bid: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub best_ask: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub one_day_price_change: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub maker_base_fee: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub taker_base_fee: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

// ---------------------------------------------------------------------------
// Leaderboard / positions / trades (Data API)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardTrader {
    #[serde(default, deserialize_with = "de_string")]
    pub rank: String,
    #[serde(default, deserialize_with = "de_string")]
    pub proxy_wallet: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub vol: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub pnl: f64,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub x_username: Option<String>,
    #[serde(default, deserialize_with = "de_bool_lenient")]
    pub verified_badge: bool,
}

impl LeaderboardTrader {
    /// Numeric rank; 0 when the upstream omitted or mangled it.
    pub fn rank_num(&self) -> u32 {
        self.rank.trim().parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    #[serde(default, deserialize_with = "de_string")]
    pub proxy_wallet: String,
    #[serde(default, deserialize_with = "de_string")]
    pub asset: String,
    #[serde(default, deserialize_with = "de_string")]
    pub condition_id: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub size: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub avg_price: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub initial_value: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub current_value: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub cash_pnl: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub percent_pnl: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub realized_pnl: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub cur_price: f64,
    #[serde(default, deserialize_with = "de_string")]
    pub title: String,
    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "de_string")]
    pub outcome: String,
    #[serde(default)]
    pub outcome_index: Option<i64>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTrade {
    #[serde(default, deserialize_with = "de_string")]
    pub proxy_wallet: String,
    #[serde(default, deserialize_with = "de_side")]
    pub side: Side,
    #[serde(default, deserialize_with = "de_string")]
    pub asset: String,
    #[serde(default, deserialize_with = "de_string")]
    pub condition_id: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub size: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub price: f64,
    #[serde(default)]
    pub timestamp: Timestamp,
    #[serde(default, deserialize_with = "de_string")]
    pub title: String,
    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "de_string")]
    pub outcome: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl UserTrade {
    /// Signed cash impact: selling brings cash in, buying spends it.
    pub fn cash_impact(&self) -> f64 {
        match self.side {
            Side::Sell => self.size * self.price,
            Side::Buy => -self.size * self.price,
        }
    }
}

// ---------------------------------------------------------------------------
// Order Book (CLOB API): prices and sizes arrive as decimal strings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderBookEntry {
    #[serde(default, deserialize_with = "de_string")]
    pub price: String,
    #[serde(default, deserialize_with = "de_string")]
    pub size: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderBook {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub bids: Vec<OrderBookEntry>,
    #[serde(default)]
    pub asks: Vec<OrderBookEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trade_decodes_string_numbers_and_side() {
        let trade: UserTrade = serde_json::from_value(json!({
            "proxyWallet": "0xabc",
            "side": "sell",
            "size": "10",
            "price": 0.4,
            "timestamp": 1700000000
        }))
        .unwrap();
        assert_eq!(trade.side, Side::Sell);
        assert_eq!(trade.size, 10.0);
        assert_eq!(trade.timestamp, Timestamp::Numeric(1_700_000_000.0));
        assert!((trade.cash_impact() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_trade_missing_fields_default() {
        let trade: UserTrade = serde_json::from_value(json!({ "timestamp": null })).unwrap();
        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.size, 0.0);
        assert_eq!(trade.timestamp, Timestamp::Missing);
    }

    #[test]
    fn test_leaderboard_rank_as_number_or_string() {
        let a: LeaderboardTrader = serde_json::from_value(json!({ "rank": 3, "pnl": "12.5" })).unwrap();
        let b: LeaderboardTrader = serde_json::from_value(json!({ "rank": "7" })).unwrap();
        assert_eq!(a.rank_num(), 3);
        assert_eq!(a.pnl, 12.5);
        assert_eq!(b.rank_num(), 7);
        assert_eq!(b.vol, 0.0);
    }

    #[test]
    fn test_market_keeps_raw_volume_and_numeric() {
        let market: Market = serde_json::from_value(json!({
            "id": 12,
            "question": "Will it rain?",
            "volume": "1234.5",
            "volumeNum": 1234.5,
            "outcomePrices": "[\"0.6\",\"0.4\"]",
            "active": true
        }))
        .unwrap();
        assert_eq!(market.id, "12");
        assert_eq!(market.volume.as_deref(), Some("1234.5"));
        assert_eq!(market.volume_num, Some(1234.5));
        assert!(market.active);
        assert!(!market.closed);
    }
}
