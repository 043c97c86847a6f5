//! Background polling tasks, one per data category.
//!
//! Each task owns its own timer and failure domain: a failed tick flips the
//! category's state to `Failed` and the previous data stays visible until the
//! next tick succeeds. No backoff — the fixed interval is the retry schedule.

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, warn};

use crate::market::cache::MarketCache;
use crate::market::client::MarketClient;
use crate::metrics;

pub async fn run_markets_poller(
    client: MarketClient,
    cache: MarketCache,
    every: Duration,
) -> anyhow::Result<()> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;

        let watchlist = cache.watchlist().await;
        if watchlist.is_empty() {
            debug!("watch-set empty, skipping markets poll");
            continue;
        }

        cache.begin_assets_fetch().await;
        let started = Instant::now();
        match client.fetch_markets(&watchlist).await {
            Ok(assets) => {
                debug!(count = assets.len(), "markets poll ok");
                metrics::record_poll("markets", "ok", started.elapsed());
                cache.apply_assets(assets).await;
            }
            Err(err) => {
                warn!(error = %err, "markets poll failed");
                metrics::record_poll("markets", "err", started.elapsed());
                cache.fail_assets().await;
            }
        }
    }
}

pub async fn run_global_poller(
    client: MarketClient,
    cache: MarketCache,
    every: Duration,
) -> anyhow::Result<()> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;

        cache.begin_global_fetch().await;
        let started = Instant::now();
        match client.fetch_global().await {
            Ok(stats) => {
                debug!(
                    market_cap = stats.total_market_cap_usd,
                    "global poll ok"
                );
                metrics::record_poll("global", "ok", started.elapsed());
                cache.apply_global(stats).await;
            }
            Err(err) => {
                warn!(error = %err, "global poll failed");
                metrics::record_poll("global", "err", started.elapsed());
                cache.fail_global().await;
            }
        }
    }
}

pub async fn run_trending_poller(
    client: MarketClient,
    cache: MarketCache,
    every: Duration,
) -> anyhow::Result<()> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;

        cache.begin_trending_fetch().await;
        let started = Instant::now();
        match client.fetch_trending().await {
            Ok(trending) => {
                debug!(count = trending.len(), "trending poll ok");
                metrics::record_poll("trending", "ok", started.elapsed());
                cache.apply_trending(trending).await;
            }
            Err(err) => {
                warn!(error = %err, "trending poll failed");
                metrics::record_poll("trending", "err", started.elapsed());
                cache.fail_trending().await;
            }
        }
    }
}
