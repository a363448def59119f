use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::polymarket::Timestamp;

/// 2000-01-01T00:00:00Z in milliseconds. Numeric timestamps below this are seconds.
pub const SECONDS_THRESHOLD_MS: f64 = 946_684_800_000.0;

/// Round half away from zero to `decimals` places, then render with exactly that many.
fn fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid rendering "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.decimals$}")
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// `$1.5M`, `$2.5K`, `$42`.
pub fn format_volume(volume: f64) -> String {
    let volume = finite_or_zero(volume);
    if volume >= 1_000_000.0 {
        format!("${}M", fixed(volume / 1_000_000.0, 1))
    } else if volume >= 1_000.0 {
        format!("${}K", fixed(volume / 1_000.0, 1))
    } else {
        format!("${}", fixed(volume, 0))
    }
}

/// Signed PnL with the sign ahead of the currency: `+$500`, `-$12.0K`, `+$1.25M`.
pub fn format_pnl(pnl: f64) -> String {
    let pnl = finite_or_zero(pnl);
    let sign = if pnl >= 0.0 { "+" } else { "-" };
    let abs = pnl.abs();
    if abs >= 1_000_000.0 {
        format!("{sign}${}M", fixed(abs / 1_000_000.0, 2))
    } else if abs >= 1_000.0 {
        format!("{sign}${}K", fixed(abs / 1_000.0, 1))
    } else {
        format!("{sign}${}", fixed(abs, 0))
    }
}

/// `0.123` → `12.3%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", fixed(finite_or_zero(value) * 100.0, decimals))
}

/// `0x1234...abcd`. Short inputs are returned as-is.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn parse_text_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<f64>() {
        return numeric_to_ms(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn numeric_to_ms(n: f64) -> Option<i64> {
    if !n.is_finite() || n == 0.0 {
        return None;
    }
    if n < SECONDS_THRESHOLD_MS {
        Some((n * 1000.0) as i64)
    } else {
        Some(n as i64)
    }
}

/// Milliseconds since epoch, or `None` when missing, zero, or unparseable.
pub fn timestamp_millis(ts: &Timestamp) -> Option<i64> {
    match ts {
        Timestamp::Numeric(n) => numeric_to_ms(*n),
        Timestamp::Text(s) => parse_text_timestamp(s),
        Timestamp::Missing => None,
    }
}

/// Normalize to milliseconds, falling back to `now_ms`.
pub fn normalize_timestamp(ts: &Timestamp, now_ms: i64) -> i64 {
    timestamp_millis(ts).unwrap_or(now_ms)
}

/// Relative age relative to `now_ms`: `42s ago`, `3h ago`, `2mo ago`, ...
pub fn time_ago(ts: &Timestamp, now_ms: i64) -> String {
    let Some(ms) = timestamp_millis(ts).filter(|ms| *ms > 0) else {
        return "Unknown".into();
    };

    let seconds = (now_ms - ms).div_euclid(1000);
    if seconds < 0 {
        return "Just now".into();
    }

    match seconds {
        s if s < 60 => format!("{s}s ago"),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 2_592_000 => format!("{}d ago", s / 86_400),
        s if s < 31_536_000 => format!("{}mo ago", s / 2_592_000),
        s => format!("{}y ago", s / 31_536_000),
    }
}

fn utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// `Jan 5, 2024` (UTC).
pub fn format_date(ms: i64) -> String {
    utc(ms)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown".into())
}

/// `Jan 5` (UTC), used for chart axes.
pub fn format_short_date(ms: i64) -> String {
    utc(ms)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_else(|| "Unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(1_500_000.0), "$1.5M");
        assert_eq!(format_volume(2_500.0), "$2.5K");
        assert_eq!(format_volume(42.0), "$42");
        assert_eq!(format_volume(0.0), "$0");
        assert_eq!(format_volume(f64::NAN), "$0");
    }

    #[test]
    fn test_format_pnl() {
        assert_eq!(format_pnl(-12_000.0), "-$12.0K");
        assert_eq!(format_pnl(500.0), "+$500");
        assert_eq!(format_pnl(1_250_000.0), "+$1.25M");
        assert_eq!(format_pnl(-3_400_000.0), "-$3.40M");
        assert_eq!(format_pnl(0.0), "+$0");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.123, 1), "12.3%");
        assert_eq!(format_percentage(0.5, 0), "50%");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(format_address(""), "");
        assert_eq!(format_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_normalize_seconds_and_millis_agree() {
        let secs = normalize_timestamp(&Timestamp::from(1_700_000_000i64), 0);
        let millis = normalize_timestamp(&Timestamp::from(1_700_000_000_000i64), 0);
        assert_eq!(secs, 1_700_000_000_000);
        assert_eq!(secs, millis);
    }

    #[test]
    fn test_normalize_iso_string() {
        let ms = normalize_timestamp(&Timestamp::from("2023-11-14T22:13:20Z"), 0);
        assert_eq!(ms, 1_700_000_000_000);
        let naive = normalize_timestamp(&Timestamp::from("2023-11-14T22:13:20.000"), 0);
        assert_eq!(naive, 1_700_000_000_000);
    }

    #[test]
    fn test_normalize_falls_back_to_now() {
        assert_eq!(normalize_timestamp(&Timestamp::Missing, NOW), NOW);
        assert_eq!(normalize_timestamp(&Timestamp::from(0i64), NOW), NOW);
        assert_eq!(normalize_timestamp(&Timestamp::from("not a date"), NOW), NOW);
    }

    #[test]
    fn test_time_ago_buckets() {
        let ago = |secs: i64| time_ago(&Timestamp::from((NOW - secs * 1000) / 1000), NOW);
        assert_eq!(ago(42), "42s ago");
        assert_eq!(ago(5 * 60), "5m ago");
        assert_eq!(ago(3 * 3_600), "3h ago");
        assert_eq!(ago(4 * 86_400), "4d ago");
        assert_eq!(ago(65 * 86_400), "2mo ago");
        assert_eq!(ago(800 * 86_400), "2y ago");
    }

    #[test]
    fn test_time_ago_edge_cases() {
        assert_eq!(time_ago(&Timestamp::Missing, NOW), "Unknown");
        assert_eq!(time_ago(&Timestamp::from("garbage"), NOW), "Unknown");
        assert_eq!(time_ago(&Timestamp::from(NOW + 60_000), NOW), "Just now");
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(format_date(1_700_000_000_000), "Nov 14, 2023");
        assert_eq!(format_short_date(1_700_000_000_000), "Nov 14");
    }
}
