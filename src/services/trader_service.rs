use futures_util::future::join_all;
use serde::Serialize;

use crate::intelligence::{InsiderSignal, LeaderboardCategory, LeaderboardOrder, TimePeriod, TraderSummary};
use crate::models::TrackedWallet;
use crate::polymarket::{LeaderboardTrader, QueryPairs, UpstreamError, Upstreams, UserTrade};

/// Trades pulled for the equity curve and monthly breakdown.
const SUMMARY_TRADE_LIMIT: u32 = 500;
const SUMMARY_POSITION_LIMIT: u32 = 100;
/// Trades shown per wallet on the tracker page.
const LIVE_TRADE_LIMIT: u32 = 10;
/// Daily leaderboard depth used to rank signal traders.
const SIGNAL_LEADERBOARD_LIMIT: u32 = 50;
/// Traders whose fills feed the signals view.
const SIGNAL_TRADERS: usize = 10;
const SIGNAL_TRADES_PER_TRADER: u32 = 5;

/// A failed leg degrades to an empty value instead of failing the whole view.
fn or_empty<T: Default>(leg: &'static str, wallet: &str, result: Result<T, UpstreamError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            metrics::counter!("upstream_errors_total", "resource" => leg).increment(1);
            tracing::warn!(leg, wallet = %wallet, error = %e, "Upstream leg failed, using empty result");
            T::default()
        }
    }
}

fn positions_query(wallet: &str) -> QueryPairs {
    vec![
        ("user".to_string(), wallet.to_string()),
        ("limit".to_string(), SUMMARY_POSITION_LIMIT.to_string()),
        ("sortBy".to_string(), "CASHPNL".to_string()),
        ("sortDirection".to_string(), "DESC".to_string()),
    ]
}

/// Fetch leaderboard entry, open positions and trade history in parallel and
/// derive the trader profile metrics from them.
pub async fn trader_summary(upstreams: &Upstreams, wallet: &str, now_ms: i64) -> TraderSummary {
    let positions_q = positions_query(wallet);

    let (entry, positions, trades) = tokio::join!(
        upstreams.data.leaderboard_entry(wallet),
        upstreams.data.positions(&positions_q),
        upstreams.data.recent_trades(wallet, SUMMARY_TRADE_LIMIT),
    );

    let entry = or_empty("leaderboard", wallet, entry);
    let positions = or_empty("positions", wallet, positions);
    let trades = or_empty("trades", wallet, trades);

    tracing::debug!(
        wallet = %wallet,
        ranked = entry.is_some(),
        positions = positions.len(),
        trades = trades.len(),
        "Trader summary fetched"
    );

    TraderSummary::build(wallet, entry.as_ref(), &positions, &trades, now_ms)
}

/// Tracked wallet plus its current leaderboard standing and latest fills.
#[derive(Debug, Clone, Serialize)]
pub struct LiveWallet {
    #[serde(flatten)]
    pub wallet: TrackedWallet,
    pub leaderboard: Option<LeaderboardTrader>,
    pub recent_trades: Vec<UserTrade>,
}

async fn live_wallet(upstreams: &Upstreams, wallet: TrackedWallet) -> LiveWallet {
    let address = wallet.wallet_address.as_str();
    let (entry, trades) = tokio::join!(
        upstreams.data.leaderboard_entry(address),
        upstreams.data.recent_trades(address, LIVE_TRADE_LIMIT),
    );
    let leaderboard = or_empty("leaderboard", address, entry);
    let recent_trades = or_empty("trades", address, trades);

    LiveWallet {
        wallet,
        leaderboard,
        recent_trades,
    }
}

/// One fan-out per wallet, all wallets concurrently; output keeps input order.
pub async fn live_wallets(upstreams: &Upstreams, wallets: Vec<TrackedWallet>) -> Vec<LiveWallet> {
    join_all(wallets.into_iter().map(|w| live_wallet(upstreams, w))).await
}

async fn trader_signals(upstreams: &Upstreams, trader: LeaderboardTrader) -> Vec<InsiderSignal> {
    let trades = upstreams
        .data
        .recent_trades(&trader.proxy_wallet, SIGNAL_TRADES_PER_TRADER)
        .await;
    or_empty("trades", &trader.proxy_wallet, trades)
        .into_iter()
        .map(|trade| InsiderSignal::new(trade, &trader))
        .collect()
}

/// Latest fills of today's top traders, tagged with their rank and PnL.
///
/// The leaderboard is required; a failed trades leg only drops that trader.
pub async fn insider_signals(upstreams: &Upstreams) -> Result<Vec<InsiderSignal>, UpstreamError> {
    let query = vec![
        ("category".to_string(), LeaderboardCategory::Overall.as_str().to_string()),
        ("timePeriod".to_string(), TimePeriod::Day.as_str().to_string()),
        ("orderBy".to_string(), LeaderboardOrder::Pnl.as_str().to_string()),
        ("limit".to_string(), SIGNAL_LEADERBOARD_LIMIT.to_string()),
    ];
    let traders = upstreams.data.leaderboard(&query).await?;

    let per_trader = join_all(
        traders
            .into_iter()
            .take(SIGNAL_TRADERS)
            .map(|t| trader_signals(upstreams, t)),
    )
    .await;
    let signals: Vec<InsiderSignal> = per_trader.into_iter().flatten().collect();

    tracing::debug!(signals = signals.len(), "Insider signals fetched");
    Ok(signals)
}
