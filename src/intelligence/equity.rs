use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::polymarket::UserTrade;

use super::format::{format_short_date, normalize_timestamp};

/// One day on the cumulative PnL chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub day: NaiveDate,
    /// Chart label, e.g. `Nov 14`.
    pub date: String,
    pub daily_pnl: f64,
    pub value: f64,
}

/// Net monthly cash flow implied by trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPnl {
    /// `YYYY-MM`
    pub month: String,
    /// `Jan`, `Feb`, ...
    pub label: String,
    pub pnl: f64,
}

fn trade_day(trade: &UserTrade, now_ms: i64) -> Option<NaiveDate> {
    let ms = normalize_timestamp(&trade.timestamp, now_ms);
    Utc.timestamp_millis_opt(ms).single().map(|dt| dt.date_naive())
}

/// Sum signed trade impact per UTC day, in chronological order.
fn daily_deltas(trades: &[UserTrade], now_ms: i64) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for trade in trades {
        let Some(day) = trade_day(trade, now_ms) else {
            continue;
        };
        let impact = trade.cash_impact();
        if impact.is_finite() {
            *by_day.entry(day).or_insert(0.0) += impact;
        }
    }
    by_day
}

/// Reconstruct a cumulative PnL curve from trade cash flows.
///
/// When `authoritative_pnl` is known (leaderboard PnL), the curve is rescaled
/// so its final point lands on it; see [`rescale_to`].
pub fn build_equity_curve(
    trades: &[UserTrade],
    authoritative_pnl: Option<f64>,
    now_ms: i64,
) -> Vec<EquityPoint> {
    let mut cumulative = 0.0;
    let mut curve: Vec<EquityPoint> = daily_deltas(trades, now_ms)
        .into_iter()
        .map(|(day, delta)| {
            cumulative += delta;
            let midnight = day
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .unwrap_or(now_ms);
            EquityPoint {
                day,
                date: format_short_date(midnight),
                daily_pnl: delta,
                value: cumulative,
            }
        })
        .collect();

    if let Some(target) = authoritative_pnl {
        rescale_to(&mut curve, target);
    }

    curve
}

/// Force the curve's last point to `target`.
///
/// Proportional scaling when both the raw final value and `target` are
/// non-zero; otherwise the gap is spread linearly across the points.
/// Daily deltas are recomputed from the adjusted values.
pub fn rescale_to(curve: &mut [EquityPoint], target: f64) {
    let n = curve.len();
    if n == 0 || !target.is_finite() {
        return;
    }

    let raw_final = curve[n - 1].value;
    if raw_final != 0.0 && target != 0.0 {
        let scale = target / raw_final;
        for point in curve.iter_mut() {
            point.value *= scale;
        }
    } else {
        let gap = target - raw_final;
        for (i, point) in curve.iter_mut().enumerate() {
            point.value += gap * (i + 1) as f64 / n as f64;
        }
    }

    let mut prev = 0.0;
    for point in curve.iter_mut() {
        point.daily_pnl = point.value - prev;
        prev = point.value;
    }
}

/// Per-day returns of the curve (first day measured from zero).
pub fn daily_returns(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.daily_pnl).collect()
}

/// Net trade impact per calendar month, last six months with activity.
pub fn monthly_performance(trades: &[UserTrade], now_ms: i64) -> Vec<MonthlyPnl> {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for trade in trades {
        let Some(day) = trade_day(trade, now_ms) else {
            continue;
        };
        let impact = trade.cash_impact();
        if impact.is_finite() {
            *months.entry((day.year(), day.month())).or_insert(0.0) += impact;
        }
    }

    let skip = months.len().saturating_sub(6);
    months
        .into_iter()
        .skip(skip)
        .map(|((year, month), pnl)| {
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default();
            MonthlyPnl {
                month: format!("{year}-{month:02}"),
                label,
                pnl,
            }
        })
        .collect()
}
