use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::market::types::{
    AssetMarketData, FetchState, GlobalStats, MarketSnapshot, TrendingAsset,
};

/// Process-wide market data cache.
///
/// One instance is shared by the pollers (writers) and every consumer
/// (readers). Cheap to clone — just an Arc bump. Each polling category is
/// replaced wholesale on a successful fetch; a failure leaves the previous
/// data in place and flips only that category's state flag.
#[derive(Clone)]
pub struct MarketCache {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    watchlist: Vec<String>,
    snapshot: MarketSnapshot,
}

impl MarketCache {
    /// Seed the watch-set, deduplicating while preserving first-seen order.
    pub fn new(watchlist: Vec<String>) -> Self {
        MarketCache {
            inner: Arc::new(RwLock::new(Inner {
                watchlist: dedupe(watchlist),
                snapshot: MarketSnapshot::default(),
            })),
        }
    }

    pub async fn watchlist(&self) -> Vec<String> {
        self.inner.read().await.watchlist.clone()
    }

    pub async fn set_watchlist(&self, ids: Vec<String>) {
        self.inner.write().await.watchlist = dedupe(ids);
    }

    /// Idempotent: adding an id already in the set is a no-op.
    pub async fn add_to_watchlist(&self, id: &str) {
        let mut inner = self.inner.write().await;
        if !inner.watchlist.iter().any(|w| w == id) {
            inner.watchlist.push(id.to_string());
        }
    }

    /// Removing an absent id is a no-op, not an error.
    pub async fn remove_from_watchlist(&self, id: &str) {
        self.inner.write().await.watchlist.retain(|w| w != id);
    }

    /// Clone of the most recently completed snapshot.
    pub async fn snapshot(&self) -> MarketSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    /// Flip a category from `Idle` to `Loading` at first fetch. Background
    /// refetches keep showing `Ready`/`Failed` with the prior data visible.
    pub async fn begin_assets_fetch(&self) {
        let mut inner = self.inner.write().await;
        if inner.snapshot.assets_state == FetchState::Idle {
            inner.snapshot.assets_state = FetchState::Loading;
        }
    }

    pub async fn apply_assets(&self, assets: Vec<AssetMarketData>) {
        let mut inner = self.inner.write().await;
        inner.snapshot.assets = assets
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect::<HashMap<_, _>>();
        inner.snapshot.assets_state = FetchState::Ready;
    }

    pub async fn fail_assets(&self) {
        self.inner.write().await.snapshot.assets_state = FetchState::Failed;
    }

    pub async fn begin_global_fetch(&self) {
        let mut inner = self.inner.write().await;
        if inner.snapshot.global_state == FetchState::Idle {
            inner.snapshot.global_state = FetchState::Loading;
        }
    }

    pub async fn apply_global(&self, stats: GlobalStats) {
        let mut inner = self.inner.write().await;
        inner.snapshot.global = Some(stats);
        inner.snapshot.global_state = FetchState::Ready;
    }

    pub async fn fail_global(&self) {
        self.inner.write().await.snapshot.global_state = FetchState::Failed;
    }

    pub async fn begin_trending_fetch(&self) {
        let mut inner = self.inner.write().await;
        if inner.snapshot.trending_state == FetchState::Idle {
            inner.snapshot.trending_state = FetchState::Loading;
        }
    }

    pub async fn apply_trending(&self, trending: Vec<TrendingAsset>) {
        let mut inner = self.inner.write().await;
        inner.snapshot.trending = trending;
        inner.snapshot.trending_state = FetchState::Ready;
    }

    pub async fn fail_trending(&self) {
        self.inner.write().await.snapshot.trending_state = FetchState::Failed;
    }
}

fn dedupe(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, price: f64) -> AssetMarketData {
        AssetMarketData {
            id: id.to_string(),
            symbol: id[..3].to_string(),
            name: id.to_string(),
            price_usd: price,
            change_1h_pct: None,
            change_24h_pct: Some(1.0),
            change_7d_pct: None,
            market_cap_usd: 0.0,
            volume_24h_usd: 0.0,
            market_cap_rank: None,
        }
    }

    #[tokio::test]
    async fn add_to_watchlist_is_idempotent() {
        let cache = MarketCache::new(vec!["bitcoin".into()]);
        cache.add_to_watchlist("ethereum").await;
        cache.add_to_watchlist("ethereum").await;
        assert_eq!(cache.watchlist().await, vec!["bitcoin", "ethereum"]);
    }

    #[tokio::test]
    async fn removing_absent_id_is_a_noop() {
        let cache = MarketCache::new(vec!["bitcoin".into(), "solana".into()]);
        cache.remove_from_watchlist("dogecoin").await;
        assert_eq!(cache.watchlist().await.len(), 2);
    }

    #[tokio::test]
    async fn watchlist_seed_is_deduplicated_in_order() {
        let cache = MarketCache::new(vec![
            "bitcoin".into(),
            "ethereum".into(),
            "bitcoin".into(),
        ]);
        assert_eq!(cache.watchlist().await, vec!["bitcoin", "ethereum"]);
    }

    #[tokio::test]
    async fn failed_fetch_retains_previous_snapshot() {
        let cache = MarketCache::new(vec!["bitcoin".into()]);
        cache.apply_assets(vec![asset("bitcoin", 67500.0)]).await;

        cache.fail_assets().await;

        let snap = cache.snapshot().await;
        assert_eq!(snap.assets_state, FetchState::Failed);
        assert_eq!(snap.assets["bitcoin"].price_usd, 67500.0);
    }

    #[tokio::test]
    async fn loading_only_shown_before_first_data() {
        let cache = MarketCache::new(vec!["bitcoin".into()]);

        cache.begin_assets_fetch().await;
        assert_eq!(cache.snapshot().await.assets_state, FetchState::Loading);

        cache.apply_assets(vec![asset("bitcoin", 1.0)]).await;
        cache.begin_assets_fetch().await;
        assert_eq!(cache.snapshot().await.assets_state, FetchState::Ready);
    }

    #[tokio::test]
    async fn success_replaces_the_whole_category() {
        let cache = MarketCache::new(vec![]);
        cache.apply_assets(vec![asset("bitcoin", 1.0), asset("solana", 2.0)]).await;
        cache.apply_assets(vec![asset("bitcoin", 3.0)]).await;

        let snap = cache.snapshot().await;
        assert_eq!(snap.assets.len(), 1);
        assert_eq!(snap.assets["bitcoin"].price_usd, 3.0);
    }
}
