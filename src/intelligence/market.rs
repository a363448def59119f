use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::polymarket::{Market, OrderBook, OrderBookEntry, Timestamp};

use super::classifier::{map_category, market_category};
use super::format::{format_date, format_percentage, format_volume, timestamp_millis};

/// Gamma encodes list fields as a JSON string (`"[\"Yes\",\"No\"]"`); accept a real array too.
fn json_list(raw: Option<&Value>) -> Option<Vec<Value>> {
    match raw? {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s).ok()? {
            Value::Array(items) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn parse_outcomes(market: &Market) -> Vec<String> {
    json_list(market.outcomes.as_ref())
        .and_then(|items| items.iter().map(value_as_string).collect::<Option<Vec<_>>>())
        .unwrap_or_else(|| vec!["Yes".into(), "No".into()])
}

pub fn parse_outcome_prices(market: &Market) -> Vec<f64> {
    json_list(market.outcome_prices.as_ref())
        .and_then(|items| items.iter().map(value_as_f64).collect::<Option<Vec<_>>>())
        .unwrap_or_else(|| vec![0.5, 0.5])
}

pub fn parse_clob_token_ids(market: &Market) -> Vec<String> {
    json_list(market.clob_token_ids.as_ref())
        .and_then(|items| items.iter().map(value_as_string).collect::<Option<Vec<_>>>())
        .unwrap_or_default()
}

/// Price of the first outcome; 0.5 when unknown or zero.
pub fn implied_probability(market: &Market) -> f64 {
    parse_outcome_prices(market)
        .first()
        .copied()
        .filter(|p| *p != 0.0 && p.is_finite())
        .unwrap_or(0.5)
}

fn numeric_or_parsed(num: Option<f64>, raw: Option<&str>) -> f64 {
    num.filter(|v| *v != 0.0 && v.is_finite())
        .or_else(|| raw.and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0.0)
}

pub fn volume_num(market: &Market) -> f64 {
    numeric_or_parsed(market.volume_num, market.volume.as_deref())
}

pub fn liquidity_num(market: &Market) -> f64 {
    numeric_or_parsed(market.liquidity_num, market.liquidity.as_deref())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeQuote {
    pub name: String,
    pub price: f64,
}

/// Market browser card.
#[derive(Debug, Clone, Serialize)]
pub struct MarketCard {
    pub id: String,
    pub question: String,
    pub slug: String,
    pub category: String,
    /// Dashboard label for `category`, e.g. `WEATHER` → `Science`.
    pub category_label: String,
    pub outcomes: Vec<OutcomeQuote>,
    pub implied_probability: f64,
    /// `62%`
    pub implied_probability_formatted: String,
    pub volume: f64,
    pub volume_formatted: String,
    pub liquidity: f64,
    pub liquidity_formatted: String,
    pub clob_token_ids: Vec<String>,
    pub end_date: Option<String>,
    /// `Jan 5, 2024`; `None` when the end date is absent or unparseable.
    pub end_date_formatted: Option<String>,
    pub image: Option<String>,
    pub active: bool,
    pub closed: bool,
}

impl MarketCard {
    pub fn from_market(market: &Market) -> Self {
        let prices = parse_outcome_prices(market);
        let outcomes = parse_outcomes(market)
            .into_iter()
            .enumerate()
            .map(|(i, name)| OutcomeQuote {
                name,
                price: prices.get(i).copied().unwrap_or(0.0),
            })
            .collect();
        let volume = volume_num(market);
        let liquidity = liquidity_num(market);
        let category = market_category(market);
        let probability = implied_probability(market);
        let end_date_formatted = market
            .end_date
            .as_deref()
            .and_then(|raw| timestamp_millis(&Timestamp::from(raw)))
            .map(format_date);

        Self {
            id: market.id.clone(),
            question: market.question.clone(),
            slug: market.slug.clone(),
            category_label: map_category(Some(category.as_str())),
            category,
            outcomes,
            implied_probability: probability,
            implied_probability_formatted: format_percentage(probability, 0),
            volume,
            volume_formatted: format_volume(volume),
            liquidity,
            liquidity_formatted: format_volume(liquidity),
            clob_token_ids: parse_clob_token_ids(market),
            end_date: market.end_date.clone(),
            end_date_formatted,
            image: market.image.clone().or_else(|| market.icon.clone()),
            active: market.active,
            closed: market.closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Order book depth
// ---------------------------------------------------------------------------

/// Size resting within `range` of the mid on each side of the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityDepth {
    /// Ask size a buyer can take without moving past `mid * (1 + range)`.
    pub buy_liquidity: Decimal,
    /// Bid size a seller can hit without moving past `mid * (1 - range)`.
    pub sell_liquidity: Decimal,
    pub mid_price: Decimal,
}

impl LiquidityDepth {
    fn empty() -> Self {
        Self {
            buy_liquidity: Decimal::ZERO,
            sell_liquidity: Decimal::ZERO,
            mid_price: Decimal::new(5, 1),
        }
    }
}

fn parse_levels(entries: &[OrderBookEntry]) -> Vec<(Decimal, Decimal)> {
    entries
        .iter()
        .filter_map(|e| {
            let price = Decimal::from_str(e.price.trim()).ok()?;
            let size = Decimal::from_str(e.size.trim()).ok()?;
            Some((price, size))
        })
        .collect()
}

fn checked_sum(sizes: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    sizes.fold(Some(Decimal::ZERO), |acc, size| acc?.checked_add(size))
}

/// Depth within `range` (e.g. 0.1 = 10%) of the mid price.
///
/// Levels are sorted best-first before walking, so the upstream ordering of
/// `bids`/`asks` does not matter. An empty side, or a book whose numbers
/// overflow, yields zero depth at mid 0.5.
pub fn liquidity_depth(book: &OrderBook, range: Decimal) -> LiquidityDepth {
    let mut bids = parse_levels(&book.bids);
    let mut asks = parse_levels(&book.asks);
    if bids.is_empty() || asks.is_empty() {
        return LiquidityDepth::empty();
    }

    bids.sort_by(|a, b| b.0.cmp(&a.0));
    asks.sort_by(|a, b| a.0.cmp(&b.0));

    let Some(mid_price) = bids[0].0.checked_add(asks[0].0).and_then(|sum| sum.checked_div(Decimal::TWO)) else {
        return LiquidityDepth::empty();
    };
    let upper = Decimal::ONE.checked_add(range).and_then(|f| mid_price.checked_mul(f));
    let lower = Decimal::ONE.checked_sub(range).and_then(|f| mid_price.checked_mul(f));
    let (Some(upper), Some(lower)) = (upper, lower) else {
        return LiquidityDepth::empty();
    };

    let buy_liquidity = checked_sum(
        asks.iter()
            .take_while(|(price, _)| *price <= upper)
            .map(|(_, size)| *size),
    );
    let sell_liquidity = checked_sum(
        bids.iter()
            .take_while(|(price, _)| *price >= lower)
            .map(|(_, size)| *size),
    );

    match (buy_liquidity, sell_liquidity) {
        (Some(buy_liquidity), Some(sell_liquidity)) => LiquidityDepth {
            buy_liquidity,
            sell_liquidity,
            mid_price,
        },
        _ => LiquidityDepth::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market(outcomes: Value, prices: Value) -> Market {
        Market {
            outcomes: Some(outcomes),
            outcome_prices: Some(prices),
            ..Default::default()
        }
    }

    fn level(price: &str, size: &str) -> OrderBookEntry {
        OrderBookEntry {
            price: price.into(),
            size: size.into(),
        }
    }

    #[test]
    fn test_parse_stringified_lists() {
        let m = market(json!("[\"Up\",\"Down\"]"), json!("[\"0.62\",\"0.38\"]"));
        assert_eq!(parse_outcomes(&m), vec!["Up", "Down"]);
        assert_eq!(parse_outcome_prices(&m), vec![0.62, 0.38]);
        assert!((implied_probability(&m) - 0.62).abs() < 1e-12);
    }

    #[test]
    fn test_parse_real_arrays() {
        let m = market(json!(["Yes", "No"]), json!([0.3, 0.7]));
        assert_eq!(parse_outcome_prices(&m), vec![0.3, 0.7]);
    }

    #[test]
    fn test_malformed_lists_fall_back() {
        let m = market(json!("not json"), json!("[\"abc\"]"));
        assert_eq!(parse_outcomes(&m), vec!["Yes", "No"]);
        assert_eq!(parse_outcome_prices(&m), vec![0.5, 0.5]);
        assert!(parse_clob_token_ids(&m).is_empty());
        assert_eq!(implied_probability(&Market::default()), 0.5);
    }

    #[test]
    fn test_volume_prefers_numeric_field() {
        let mut m = Market {
            volume: Some("1234.5".into()),
            ..Default::default()
        };
        assert_eq!(volume_num(&m), 1234.5);
        m.volume_num = Some(99.0);
        assert_eq!(volume_num(&m), 99.0);
        assert_eq!(liquidity_num(&m), 0.0);
    }

    #[test]
    fn test_market_card_zips_outcomes() {
        let mut m = market(json!("[\"Yes\",\"No\"]"), json!("[\"0.25\",\"0.75\"]"));
        m.id = "42".into();
        m.volume_num = Some(2_500_000.0);
        m.clob_token_ids = Some(json!("[\"111\",\"222\"]"));
        let card = MarketCard::from_market(&m);
        assert_eq!(card.outcomes[1], OutcomeQuote { name: "No".into(), price: 0.75 });
        assert_eq!(card.volume_formatted, "$2.5M");
        assert_eq!(card.clob_token_ids, vec!["111", "222"]);
        assert_eq!(card.category, "Other");
        assert_eq!(card.category_label, "Other");
        assert_eq!(card.implied_probability_formatted, "25%");
        assert_eq!(card.end_date_formatted, None);
    }

    #[test]
    fn test_market_card_labels_and_end_date() {
        let mut m = market(json!(["Yes", "No"]), json!([0.625, 0.375]));
        m.category = Some("WEATHER".into());
        m.end_date = Some("2024-11-05T12:00:00Z".into());
        let card = MarketCard::from_market(&m);
        assert_eq!(card.category, "WEATHER");
        assert_eq!(card.category_label, "Science");
        assert_eq!(card.implied_probability_formatted, "63%");
        assert_eq!(card.end_date_formatted.as_deref(), Some("Nov 5, 2024"));
    }

    #[test]
    fn test_liquidity_depth_within_range() {
        let book = OrderBook {
            // CLOB lists bids ascending and asks descending
            bids: vec![level("0.30", "500"), level("0.45", "100"), level("0.48", "200")],
            asks: vec![level("0.70", "900"), level("0.54", "50"), level("0.52", "150")],
            ..Default::default()
        };
        let depth = liquidity_depth(&book, Decimal::new(1, 1));
        assert_eq!(depth.mid_price, Decimal::new(50, 2));
        // upper = 0.55 → 150 + 50; lower = 0.45 → 200 + 100
        assert_eq!(depth.buy_liquidity, Decimal::from(200));
        assert_eq!(depth.sell_liquidity, Decimal::from(300));
    }

    #[test]
    fn test_liquidity_depth_empty_side() {
        let book = OrderBook {
            bids: vec![level("0.4", "10")],
            ..Default::default()
        };
        let depth = liquidity_depth(&book, Decimal::new(1, 1));
        assert_eq!(depth, LiquidityDepth::empty());
        assert_eq!(depth.mid_price, Decimal::new(5, 1));
    }

    #[test]
    fn test_liquidity_depth_overflowing_book_is_empty() {
        let max = Decimal::MAX.to_string();
        let book = OrderBook {
            bids: vec![level(&max, "1")],
            asks: vec![level(&max, "1")],
            ..Default::default()
        };
        assert_eq!(liquidity_depth(&book, Decimal::new(1, 1)), LiquidityDepth::empty());

        let sizes = OrderBook {
            bids: vec![level("0.50", &max), level("0.49", &max)],
            asks: vec![level("0.52", "10")],
            ..Default::default()
        };
        assert_eq!(liquidity_depth(&sizes, Decimal::new(1, 1)), LiquidityDepth::empty());
    }
}
