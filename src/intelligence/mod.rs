pub mod classifier;
pub mod equity;
pub mod format;
pub mod market;
pub mod scorer;
pub mod signals;
pub mod summary;

pub use classifier::{
    categorize_title, category_strength, map_category, market_category, trader_badges, Category,
    CategoryStrength, LeaderboardCategory, LeaderboardOrder, TimePeriod,
};
pub use equity::{build_equity_curve, daily_returns, monthly_performance, EquityPoint, MonthlyPnl};
pub use format::{
    format_address, format_date, format_percentage, format_pnl, format_short_date, format_volume,
    normalize_timestamp, time_ago,
};
pub use market::{liquidity_depth, LiquidityDepth, MarketCard};
pub use scorer::{score_trader, smart_score, TraderScore};
pub use signals::{build_feed, Confidence, InsiderSignal, SignalFeed, SignalFilter, SignalSort, SignalStats};
pub use summary::TraderSummary;
