use serde::{Deserialize, Serialize};

use crate::polymarket::UserPosition;

/// Risk and quality metrics for one trader, as shown on the profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderScore {
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub win_rate: f64,
    pub smart_score: f64,
}

/// Compute all scores from daily returns, open positions and leaderboard totals.
pub fn score_trader(daily_returns: &[f64], positions: &[UserPosition], pnl: f64, volume: f64) -> TraderScore {
    let wr = win_rate(positions);
    TraderScore {
        sharpe_ratio: sharpe_ratio(daily_returns),
        sortino_ratio: sortino_ratio(daily_returns),
        win_rate: wr,
        smart_score: smart_score(pnl, volume, positions.len(), wr),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ---------------------------------------------------------------------------
// Metric 1: Sharpe Ratio
// ---------------------------------------------------------------------------

/// Single-period approximation: mean(returns) / stddev(returns).
/// Returns 0.0 with fewer than two points or zero dispersion.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let m = mean(returns);
    let variance = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    m / std_dev
}

// ---------------------------------------------------------------------------
// Metric 2: Sortino Ratio
// ---------------------------------------------------------------------------

/// mean(returns) / downside deviation, where the downside deviation only
/// looks at negative returns. A series with no losing days uses 1 as the
/// denominator.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let m = mean(returns);
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_dev = if downside.is_empty() {
        1.0
    } else {
        (downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64).sqrt()
    };

    if downside_dev == 0.0 || !downside_dev.is_finite() {
        return 0.0;
    }

    m / downside_dev
}

// ---------------------------------------------------------------------------
// Metric 3: Win Rate
// ---------------------------------------------------------------------------

/// Percentage (0–100) of positions currently in profit.
pub fn win_rate(positions: &[UserPosition]) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }
    let winners = positions.iter().filter(|p| p.cash_pnl > 0.0).count();
    winners as f64 / positions.len() as f64 * 100.0
}

// ---------------------------------------------------------------------------
// Metric 4: Smart Score
// ---------------------------------------------------------------------------

const SMART_SCORE_BASE: f64 = 50.0;
const MAX_PROFIT_POINTS: f64 = 30.0;
const MAX_LOSS_POINTS: f64 = 20.0;
const MAX_ACTIVITY_POINTS: f64 = 10.0;
const POINTS_PER_POSITION: f64 = 0.5;
const MAX_WIN_RATE_POINTS: f64 = 20.0;

/// Heuristic 0–100 display score.
///
/// Starts at 50. Return on volume adds up to 30 points when profitable and
/// removes up to 20 when not (1 point per percent). Each open position adds
/// 0.5 up to 10, and the win rate adds up to 20.
pub fn smart_score(pnl: f64, volume: f64, open_positions: usize, win_rate_pct: f64) -> f64 {
    let ratio = if volume > 0.0 && volume.is_finite() && pnl.is_finite() {
        pnl / volume
    } else {
        0.0
    };

    let profitability = if ratio >= 0.0 {
        (ratio * 100.0).min(MAX_PROFIT_POINTS)
    } else {
        -(ratio.abs() * 100.0).min(MAX_LOSS_POINTS)
    };

    let activity = (open_positions as f64 * POINTS_PER_POSITION).min(MAX_ACTIVITY_POINTS);

    let win_rate_pct = if win_rate_pct.is_finite() { win_rate_pct } else { 0.0 };
    let consistency = win_rate_pct.clamp(0.0, 100.0) / 100.0 * MAX_WIN_RATE_POINTS;

    let score = SMART_SCORE_BASE + profitability + activity + consistency;
    let score = if score.is_finite() { score } else { SMART_SCORE_BASE };
    score.clamp(0.0, 100.0)
}
