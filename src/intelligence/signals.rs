use std::cmp::Ordering;

use serde::Serialize;

use crate::polymarket::{LeaderboardTrader, UserTrade};

use super::format::normalize_timestamp;

/// Trade value at which a signal counts as a whale move.
pub const WHALE_VALUE: f64 = 5_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// High: top-10 trader moving at least $1K. Medium: top-50 moving at least $500.
    pub fn classify(rank: Option<u32>, value: f64) -> Self {
        match rank {
            Some(r) if r <= 10 && value >= 1_000.0 => Self::High,
            Some(r) if r <= 50 && value >= 500.0 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalSort {
    #[default]
    Recent,
    Size,
    Confidence,
}

impl SignalSort {
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "RECENT" => Some(Self::Recent),
            "SIZE" => Some(Self::Size),
            "CONFIDENCE" => Some(Self::Confidence),
            _ => None,
        }
    }
}

/// A recent trade by a leaderboard trader, tagged for the signals feed.
#[derive(Debug, Clone, Serialize)]
pub struct InsiderSignal {
    #[serde(flatten)]
    pub trade: UserTrade,
    pub trader_name: Option<String>,
    pub trader_rank: Option<u32>,
    pub trader_pnl: f64,
    pub trader_profile_image: Option<String>,
    /// `size * price`
    pub value: f64,
    pub confidence: Confidence,
    pub is_whale: bool,
}

impl InsiderSignal {
    pub fn new(trade: UserTrade, trader: &LeaderboardTrader) -> Self {
        let value = trade.size * trade.price;
        let value = if value.is_finite() { value } else { 0.0 };
        let rank = Some(trader.rank_num()).filter(|r| *r > 0);

        Self {
            trade,
            trader_name: trader.user_name.clone(),
            trader_rank: rank,
            trader_pnl: trader.pnl,
            trader_profile_image: trader.profile_image.clone(),
            value,
            confidence: Confidence::classify(rank, value),
            is_whale: value >= WHALE_VALUE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalFilter {
    pub confidence: Option<Confidence>,
    /// Minimum trade value in dollars.
    pub min_size: Option<f64>,
    pub whales_only: bool,
    pub sort: SignalSort,
}

/// Headline counts over the whole unfiltered feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalStats {
    pub total_signals: usize,
    pub high_confidence: usize,
    pub whale_trades: usize,
    pub total_volume: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalFeed {
    pub stats: SignalStats,
    pub signals: Vec<InsiderSignal>,
}

pub fn signal_stats(signals: &[InsiderSignal]) -> SignalStats {
    SignalStats {
        total_signals: signals.len(),
        high_confidence: signals.iter().filter(|s| s.confidence == Confidence::High).count(),
        whale_trades: signals.iter().filter(|s| s.is_whale).count(),
        total_volume: signals.iter().map(|s| s.value).sum(),
    }
}

/// Newest first, then filter and re-sort per `filter`.
///
/// Size and confidence sorts are stable, so ties stay newest first.
pub fn build_feed(mut signals: Vec<InsiderSignal>, filter: &SignalFilter, now_ms: i64) -> SignalFeed {
    signals.sort_by_key(|s| std::cmp::Reverse(normalize_timestamp(&s.trade.timestamp, now_ms)));
    let stats = signal_stats(&signals);

    signals.retain(|s| {
        filter.confidence.map_or(true, |c| s.confidence == c)
            && filter.min_size.map_or(true, |min| s.value >= min)
            && (!filter.whales_only || s.is_whale)
    });

    match filter.sort {
        SignalSort::Recent => {}
        SignalSort::Size => signals.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal)),
        SignalSort::Confidence => signals.sort_by_key(|s| s.confidence),
    }

    SignalFeed { stats, signals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymarket::{Side, Timestamp};

    fn trader(rank: &str) -> LeaderboardTrader {
        LeaderboardTrader {
            rank: rank.into(),
            user_name: Some("alpha".into()),
            pnl: 1_000.0,
            ..Default::default()
        }
    }

    fn trade(size: f64, price: f64, ts: i64) -> UserTrade {
        UserTrade {
            side: Side::Buy,
            size,
            price,
            timestamp: Timestamp::from(ts),
            ..Default::default()
        }
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(Confidence::classify(Some(3), 1_000.0), Confidence::High);
        assert_eq!(Confidence::classify(Some(3), 999.0), Confidence::Medium);
        assert_eq!(Confidence::classify(Some(40), 5_000.0), Confidence::Medium);
        assert_eq!(Confidence::classify(Some(40), 499.0), Confidence::Low);
        assert_eq!(Confidence::classify(Some(51), 50_000.0), Confidence::Low);
        assert_eq!(Confidence::classify(None, 50_000.0), Confidence::Low);
    }

    #[test]
    fn test_signal_tags_value_and_whale() {
        let s = InsiderSignal::new(trade(10_000.0, 0.6, 1_700_000_000), &trader("2"));
        assert_eq!(s.value, 6_000.0);
        assert!(s.is_whale);
        assert_eq!(s.confidence, Confidence::High);
        assert_eq!(s.trader_rank, Some(2));

        let unranked = InsiderSignal::new(trade(10.0, 0.5, 1_700_000_000), &trader(""));
        assert_eq!(unranked.trader_rank, None);
        assert!(!unranked.is_whale);
    }

    #[test]
    fn test_feed_sorts_newest_first_and_filters() {
        let top = trader("1");
        let signals = vec![
            InsiderSignal::new(trade(100.0, 0.5, 1_700_000_000), &top),
            InsiderSignal::new(trade(20_000.0, 0.5, 1_700_000_300), &top),
            InsiderSignal::new(trade(3_000.0, 0.5, 1_700_000_100), &top),
        ];

        let feed = build_feed(signals.clone(), &SignalFilter::default(), 0);
        let values: Vec<f64> = feed.signals.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10_000.0, 1_500.0, 50.0]);
        assert_eq!(
            feed.stats,
            SignalStats { total_signals: 3, high_confidence: 2, whale_trades: 1, total_volume: 11_550.0 }
        );

        let filter = SignalFilter { min_size: Some(1_000.0), ..Default::default() };
        assert_eq!(build_feed(signals.clone(), &filter, 0).signals.len(), 2);

        let filter = SignalFilter { whales_only: true, ..Default::default() };
        let feed = build_feed(signals.clone(), &filter, 0);
        assert_eq!(feed.signals.len(), 1);
        // Stats describe the unfiltered feed
        assert_eq!(feed.stats.total_signals, 3);

        let filter = SignalFilter { confidence: Some(Confidence::Low), ..Default::default() };
        assert_eq!(build_feed(signals, &filter, 0).signals[0].value, 50.0);
    }

    #[test]
    fn test_feed_sort_by_size_and_confidence() {
        let signals = vec![
            InsiderSignal::new(trade(2_000.0, 0.5, 1_700_000_300), &trader("30")),
            InsiderSignal::new(trade(4_000.0, 0.5, 1_700_000_200), &trader("5")),
            InsiderSignal::new(trade(100.0, 0.5, 1_700_000_100), &trader("5")),
        ];

        let by_size = SignalFilter { sort: SignalSort::Size, ..Default::default() };
        let values: Vec<f64> = build_feed(signals.clone(), &by_size, 0).signals.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![2_000.0, 1_000.0, 50.0]);

        let by_confidence = SignalFilter { sort: SignalSort::Confidence, ..Default::default() };
        let tiers: Vec<Confidence> =
            build_feed(signals, &by_confidence, 0).signals.iter().map(|s| s.confidence).collect();
        assert_eq!(tiers, vec![Confidence::High, Confidence::Medium, Confidence::Low]);
    }

    #[test]
    fn test_params() {
        assert_eq!(Confidence::from_param("high"), Some(Confidence::High));
        assert_eq!(Confidence::from_param("extreme"), None);
        assert_eq!(SignalSort::from_param("Size"), Some(SignalSort::Size));
        assert_eq!(SignalSort::from_param("random"), None);
    }
}
