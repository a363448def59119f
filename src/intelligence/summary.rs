use serde::Serialize;

use crate::polymarket::{LeaderboardTrader, Side, UserPosition, UserTrade};

use super::classifier::{category_strength, trader_badges, CategoryStrength};
use super::equity::{build_equity_curve, daily_returns, monthly_performance, EquityPoint, MonthlyPnl};
use super::format::{format_address, format_pnl, format_volume, time_ago};
use super::scorer::{score_trader, TraderScore};

const RECENT_TRADES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct TraderProfile {
    pub address: String,
    pub display_name: String,
    pub short_address: String,
    /// `None` when the wallet is not on the leaderboard.
    pub rank: Option<u32>,
    pub pnl: f64,
    pub volume: f64,
    pub pnl_formatted: String,
    pub volume_formatted: String,
    pub profile_image: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentTrade {
    pub title: String,
    pub outcome: String,
    pub side: Side,
    pub size: f64,
    pub price: f64,
    pub time_ago: String,
    pub transaction_hash: Option<String>,
}

/// Everything the trader profile page renders, derived from one fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct TraderSummary {
    pub profile: TraderProfile,
    pub open_positions: usize,
    pub total_unrealized_pnl: f64,
    pub total_position_value: f64,
    #[serde(flatten)]
    pub score: TraderScore,
    pub badges: Vec<&'static str>,
    pub equity_curve: Vec<EquityPoint>,
    pub monthly_performance: Vec<MonthlyPnl>,
    pub category_strength: Vec<CategoryStrength>,
    pub recent_trades: Vec<RecentTrade>,
}

fn finite_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).sum()
}

impl TraderSummary {
    /// Without a leaderboard entry, PnL falls back to the positions' cash PnL and
    /// volume to traded notional; the equity curve is then left unscaled.
    pub fn build(
        address: &str,
        entry: Option<&LeaderboardTrader>,
        positions: &[UserPosition],
        trades: &[UserTrade],
        now_ms: i64,
    ) -> Self {
        let total_unrealized_pnl = finite_sum(positions.iter().map(|p| p.cash_pnl));
        let total_position_value = finite_sum(positions.iter().map(|p| p.current_value));

        let (pnl, volume) = match entry {
            Some(e) => (e.pnl, e.vol),
            None => (
                total_unrealized_pnl,
                finite_sum(trades.iter().map(|t| t.size * t.price)),
            ),
        };

        let rank = entry.map(LeaderboardTrader::rank_num).filter(|r| *r > 0);
        let display_name = entry
            .and_then(|e| e.user_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format_address(address));

        let equity_curve = build_equity_curve(trades, entry.map(|e| e.pnl), now_ms);
        let returns = daily_returns(&equity_curve);
        let score = score_trader(&returns, positions, pnl, volume);

        let badges = match entry {
            Some(e) => trader_badges(e, rank.unwrap_or(u32::MAX)),
            None => Vec::new(),
        };

        let recent_trades = trades
            .iter()
            .take(RECENT_TRADES)
            .map(|t| RecentTrade {
                title: t.title.clone(),
                outcome: t.outcome.clone(),
                side: t.side,
                size: t.size,
                price: t.price,
                time_ago: time_ago(&t.timestamp, now_ms),
                transaction_hash: t.transaction_hash.clone(),
            })
            .collect();

        Self {
            profile: TraderProfile {
                address: address.to_string(),
                display_name,
                short_address: format_address(address),
                rank,
                pnl,
                volume,
                pnl_formatted: format_pnl(pnl),
                volume_formatted: format_volume(volume),
                profile_image: entry.and_then(|e| e.profile_image.clone()),
                verified: entry.is_some_and(|e| e.verified_badge),
            },
            open_positions: positions.len(),
            total_unrealized_pnl,
            total_position_value,
            score,
            badges,
            equity_curve,
            monthly_performance: monthly_performance(trades, now_ms),
            category_strength: category_strength(positions),
            recent_trades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymarket::Timestamp;

    const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const NOW: i64 = 1_700_500_000_000;

    fn positions() -> Vec<UserPosition> {
        vec![
            UserPosition {
                title: "Will BTC hit 100k?".into(),
                cash_pnl: 1_500.0,
                current_value: 4_000.0,
                ..Default::default()
            },
            UserPosition {
                title: "Election winner".into(),
                cash_pnl: -500.0,
                current_value: 1_000.0,
                ..Default::default()
            },
        ]
    }

    fn trades() -> Vec<UserTrade> {
        vec![
            UserTrade {
                side: Side::Sell,
                size: 100.0,
                price: 0.8,
                timestamp: Timestamp::from(1_700_086_400i64),
                title: "Will BTC hit 100k?".into(),
                ..Default::default()
            },
            UserTrade {
                side: Side::Buy,
                size: 100.0,
                price: 0.5,
                timestamp: Timestamp::from(1_700_000_000i64),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_summary_with_leaderboard_entry() {
        let entry = LeaderboardTrader {
            rank: "2".into(),
            proxy_wallet: ADDRESS.into(),
            user_name: Some("whale".into()),
            vol: 2_000_000.0,
            pnl: 150_000.0,
            ..Default::default()
        };
        let summary = TraderSummary::build(ADDRESS, Some(&entry), &positions(), &trades(), NOW);

        assert_eq!(summary.profile.display_name, "whale");
        assert_eq!(summary.profile.rank, Some(2));
        assert_eq!(summary.profile.pnl_formatted, "+$150.0K");
        assert_eq!(summary.open_positions, 2);
        assert_eq!(summary.total_unrealized_pnl, 1_000.0);
        assert_eq!(summary.total_position_value, 5_000.0);
        assert_eq!(summary.score.win_rate, 50.0);
        assert_eq!(summary.badges, vec!["Top 2", "Big Player", "Consistent"]);
        let last = summary.equity_curve.last().unwrap();
        assert!((last.value - 150_000.0).abs() < 1e-6);
        assert_eq!(summary.recent_trades.len(), 2);
        assert!((0.0..=100.0).contains(&summary.score.smart_score));
    }

    #[test]
    fn test_summary_without_entry_falls_back() {
        let summary = TraderSummary::build(ADDRESS, None, &positions(), &trades(), NOW);
        assert_eq!(summary.profile.display_name, "0x1234...5678");
        assert_eq!(summary.profile.rank, None);
        assert_eq!(summary.profile.pnl, 1_000.0);
        assert!((summary.profile.volume - 130.0).abs() < 1e-9);
        assert!(summary.badges.is_empty());
        // Raw curve: -50 then +80
        assert!((summary.equity_curve.last().unwrap().value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_empty_wallet() {
        let summary = TraderSummary::build(ADDRESS, None, &[], &[], NOW);
        assert_eq!(summary.score.smart_score, 50.0);
        assert_eq!(summary.score.sharpe_ratio, 0.0);
        assert!(summary.equity_curve.is_empty());
        assert!(summary.category_strength.is_empty());
    }
}
