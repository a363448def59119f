use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::polymarket::{LeaderboardTrader, Market, UserPosition};

// ---------------------------------------------------------------------------
// Title-based market category
// ---------------------------------------------------------------------------

/// Coarse category inferred from free-text market titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Crypto,
    Politics,
    Sports,
    Finance,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crypto => "Crypto",
            Category::Politics => "Politics",
            Category::Sports => "Sports",
            Category::Finance => "Finance",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; first hit wins.
const TITLE_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Crypto, &["btc", "eth", "crypto", "bitcoin"]),
    (Category::Politics, &["trump", "biden", "election", "president"]),
    (Category::Sports, &["nfl", "nba", "sport"]),
    (Category::Finance, &["stock", "fed", "rate"]),
];

/// Classify a market title by case-insensitive substring match.
pub fn categorize_title(title: &str) -> Category {
    let lower = title.to_lowercase();
    TITLE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStrength {
    pub category: Category,
    pub trades: usize,
    /// 0–100, 50 = break-even.
    pub strength: f64,
}

/// Per-category position count and a PnL-derived strength bar (top 5).
pub fn category_strength(positions: &[UserPosition]) -> Vec<CategoryStrength> {
    let mut buckets: BTreeMap<Category, (usize, f64)> = BTreeMap::new();
    for pos in positions {
        let entry = buckets.entry(categorize_title(&pos.title)).or_insert((0, 0.0));
        entry.0 += 1;
        if pos.cash_pnl.is_finite() {
            entry.1 += pos.cash_pnl;
        }
    }

    let mut strengths: Vec<CategoryStrength> = buckets
        .into_iter()
        .map(|(category, (trades, pnl))| CategoryStrength {
            category,
            trades,
            strength: (50.0 + pnl / 100.0).clamp(0.0, 100.0),
        })
        .collect();

    strengths.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    strengths.truncate(5);
    strengths
}

/// Display category of a Gamma market: explicit category, first tag, or "Other".
pub fn market_category(market: &Market) -> String {
    market
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| market.tags.first().map(|t| t.label.as_str()).filter(|l| !l.is_empty()))
        .unwrap_or("Other")
        .to_string()
}

// ---------------------------------------------------------------------------
// Leaderboard query vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaderboardCategory {
    #[default]
    Overall,
    Politics,
    Sports,
    Crypto,
    Culture,
    Mentions,
    Weather,
    Economics,
    Tech,
    Finance,
}

impl LeaderboardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "OVERALL",
            Self::Politics => "POLITICS",
            Self::Sports => "SPORTS",
            Self::Crypto => "CRYPTO",
            Self::Culture => "CULTURE",
            Self::Mentions => "MENTIONS",
            Self::Weather => "WEATHER",
            Self::Economics => "ECONOMICS",
            Self::Tech => "TECH",
            Self::Finance => "FINANCE",
        }
    }

    /// Accepts API values (`CRYPTO`) and UI labels (`Pop Culture`, `All`).
    pub fn from_param(raw: &str) -> Option<Self> {
        let category = match raw.trim().to_uppercase().as_str() {
            "OVERALL" | "ALL" => Self::Overall,
            "POLITICS" => Self::Politics,
            "SPORTS" => Self::Sports,
            "CRYPTO" => Self::Crypto,
            "CULTURE" | "POP CULTURE" => Self::Culture,
            "MENTIONS" => Self::Mentions,
            "WEATHER" => Self::Weather,
            "ECONOMICS" => Self::Economics,
            "TECH" => Self::Tech,
            "FINANCE" => Self::Finance,
            _ => return None,
        };
        Some(category)
    }

    /// UI label for an API category.
    pub fn ui_label(&self) -> &'static str {
        match self {
            Self::Overall => "All",
            Self::Politics => "Politics",
            Self::Sports => "Sports",
            Self::Crypto => "Crypto",
            Self::Culture | Self::Mentions => "Pop Culture",
            Self::Weather => "Science",
            Self::Economics | Self::Finance => "Finance",
            Self::Tech => "Tech",
        }
    }
}

/// Map a raw API category string to its UI label; unknown values pass through.
pub fn map_category(category: Option<&str>) -> String {
    match category.filter(|c| !c.is_empty()) {
        None => "Other".into(),
        Some(raw) => LeaderboardCategory::from_param(raw)
            .filter(|c| *c != LeaderboardCategory::Overall)
            .map(|c| c.ui_label().to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimePeriod {
    Day,
    #[default]
    Week,
    Month,
    All,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::All => "ALL",
        }
    }

    /// Accepts API values (`WEEK`) and UI timeframes (`24H`, `7D`, `30D`, `All`).
    pub fn from_param(raw: &str) -> Option<Self> {
        let period = match raw.trim().to_uppercase().as_str() {
            "DAY" | "24H" | "1D" => Self::Day,
            "WEEK" | "7D" | "1W" => Self::Week,
            "MONTH" | "30D" | "1M" => Self::Month,
            "ALL" => Self::All,
            _ => return None,
        };
        Some(period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaderboardOrder {
    #[default]
    Pnl,
    Vol,
}

impl LeaderboardOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pnl => "PNL",
            Self::Vol => "VOL",
        }
    }

    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "PNL" => Some(Self::Pnl),
            "VOL" | "VOLUME" => Some(Self::Vol),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Trader badges
// ---------------------------------------------------------------------------

/// Up to three badges: rank tier, volume tier, PnL tier (in that order).
pub fn trader_badges(trader: &LeaderboardTrader, rank: u32) -> Vec<&'static str> {
    let mut badges = Vec::with_capacity(3);

    match rank {
        1 => badges.push("Top 1"),
        2 => badges.push("Top 2"),
        3 => badges.push("Top 3"),
        4..=10 => badges.push("Top 10"),
        11..=25 => badges.push("Top 25"),
        _ => {}
    }

    if trader.vol > 10_000_000.0 {
        badges.push("High Roller");
    } else if trader.vol > 1_000_000.0 {
        badges.push("Big Player");
    } else if trader.vol > 100_000.0 {
        badges.push("Active");
    }

    if trader.pnl > 500_000.0 {
        badges.push("Alpha Hunter");
    } else if trader.pnl > 100_000.0 {
        badges.push("Consistent");
    } else if trader.pnl > 10_000.0 {
        badges.push("In Profit");
    } else if trader.pnl > 0.0 {
        badges.push("Positive");
    }

    badges.truncate(3);
    badges
}
