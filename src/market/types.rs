use std::collections::HashMap;

/// Lightweight per-asset view of the latest market data.
/// Stores only the fields the dashboard renders, not the full API payload.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetMarketData {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price_usd: f64,
    pub change_1h_pct: Option<f64>,
    pub change_24h_pct: Option<f64>,
    pub change_7d_pct: Option<f64>,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
    pub market_cap_rank: Option<u32>,
}

/// Aggregate market-wide stats.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalStats {
    pub total_market_cap_usd: f64,
    pub total_volume_usd: f64,
    pub btc_dominance_pct: f64,
    pub active_assets: u64,
}

/// Entry in the trending list, unrelated to the watch-set.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendingAsset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
}

/// Lifecycle of one polling category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Immutable result of the most recently completed fetches, one copy per
/// category. A fetch in flight never partially overwrites any of it.
#[derive(Clone, Debug)]
pub struct MarketSnapshot {
    pub assets: HashMap<String, AssetMarketData>,
    pub global: Option<GlobalStats>,
    pub trending: Vec<TrendingAsset>,
    pub assets_state: FetchState,
    pub global_state: FetchState,
    pub trending_state: FetchState,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        MarketSnapshot {
            assets: HashMap::new(),
            global: None,
            trending: Vec::new(),
            assets_state: FetchState::Idle,
            global_state: FetchState::Idle,
            trending_state: FetchState::Idle,
        }
    }
}
