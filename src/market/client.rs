//! CoinGecko REST client.
//!
//! Read-only, unauthenticated GET endpoints. The free tier rate-limits
//! aggressively, so every call is treated as best-effort: an HTTP error or a
//! payload we cannot decode comes back as `Err` and the caller keeps the
//! previous snapshot.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::market::types::{AssetMarketData, GlobalStats, TrendingAsset};

pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    api_base: String,
}

impl MarketClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(MarketClient { http, api_base: api_base.into() })
    }

    /// Per-asset market rows for the given ids, ordered by market cap.
    pub async fn fetch_markets(&self, ids: &[String]) -> Result<Vec<AssetMarketData>> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&ids={}&order=market_cap_desc\
             &per_page=50&page=1&sparkline=false&price_change_percentage=1h,24h,7d",
            self.api_base,
            ids.join(","),
        );

        let rows: Vec<MarketsRow> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding /coins/markets payload")?;

        Ok(rows.into_iter().map(MarketsRow::into_asset).collect())
    }

    /// Market-wide aggregate stats.
    pub async fn fetch_global(&self) -> Result<GlobalStats> {
        let url = format!("{}/global", self.api_base);

        let body: GlobalEnvelope = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding /global payload")?;

        let data = body.data;
        Ok(GlobalStats {
            total_market_cap_usd: usd(&data.total_market_cap),
            total_volume_usd: usd(&data.total_volume),
            btc_dominance_pct: data
                .market_cap_percentage
                .get("btc")
                .copied()
                .unwrap_or(0.0),
            active_assets: data.active_cryptocurrencies,
        })
    }

    /// Currently trending assets, independent of the watch-set.
    pub async fn fetch_trending(&self) -> Result<Vec<TrendingAsset>> {
        let url = format!("{}/search/trending", self.api_base);

        let body: TrendingEnvelope = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding /search/trending payload")?;

        Ok(body
            .coins
            .into_iter()
            .map(|c| TrendingAsset {
                id: c.item.id,
                symbol: c.item.symbol,
                name: c.item.name,
                market_cap_rank: c.item.market_cap_rank,
            })
            .collect())
    }
}

fn usd(by_currency: &HashMap<String, f64>) -> f64 {
    by_currency.get("usd").copied().unwrap_or(0.0)
}

// Wire models. Numeric fields are nullable on CoinGecko's side for thin or
// delisted assets, so everything optional defaults instead of failing the
// whole batch.

#[derive(Debug, Deserialize)]
struct MarketsRow {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h_in_currency: Option<f64>,
    #[serde(default)]
    price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    total_volume: Option<f64>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

impl MarketsRow {
    fn into_asset(self) -> AssetMarketData {
        AssetMarketData {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            price_usd: self.current_price.unwrap_or(0.0),
            change_1h_pct: self.price_change_percentage_1h_in_currency,
            change_24h_pct: self.price_change_percentage_24h_in_currency,
            change_7d_pct: self.price_change_percentage_7d_in_currency,
            market_cap_usd: self.market_cap.unwrap_or(0.0),
            volume_24h_usd: self.total_volume.unwrap_or(0.0),
            market_cap_rank: self.market_cap_rank,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GlobalEnvelope {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    #[serde(default)]
    total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    #[serde(default)]
    market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    active_cryptocurrencies: u64,
}

#[derive(Debug, Deserialize)]
struct TrendingEnvelope {
    coins: Vec<TrendingCoin>,
}

#[derive(Debug, Deserialize)]
struct TrendingCoin {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_row_decodes_with_null_numerics() {
        let raw = r#"[{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": 67500.0,
            "price_change_percentage_24h_in_currency": -1.2,
            "market_cap": 1330000000000.0,
            "total_volume": null,
            "market_cap_rank": 1
        }]"#;

        let rows: Vec<MarketsRow> = serde_json::from_str(raw).unwrap();
        let asset = rows.into_iter().next().unwrap().into_asset();
        assert_eq!(asset.price_usd, 67500.0);
        assert_eq!(asset.volume_24h_usd, 0.0);
        assert_eq!(asset.change_24h_pct, Some(-1.2));
        assert_eq!(asset.change_7d_pct, None);
    }

    #[test]
    fn global_envelope_reads_usd_figures() {
        let raw = r#"{"data": {
            "total_market_cap": {"usd": 2500000000000.0, "eur": 2300000000000.0},
            "total_volume": {"usd": 90000000000.0},
            "market_cap_percentage": {"btc": 52.3, "eth": 17.1},
            "active_cryptocurrencies": 10512
        }}"#;

        let body: GlobalEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(usd(&body.data.total_market_cap), 2_500_000_000_000.0);
        assert_eq!(body.data.active_cryptocurrencies, 10512);
    }

    #[test]
    fn trending_envelope_unwraps_item_nesting() {
        let raw = r#"{"coins": [
            {"item": {"id": "pepe", "symbol": "PEPE", "name": "Pepe", "market_cap_rank": 40}},
            {"item": {"id": "sui", "symbol": "SUI", "name": "Sui"}}
        ]}"#;

        let body: TrendingEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(body.coins.len(), 2);
        assert_eq!(body.coins[1].item.market_cap_rank, None);
    }
}
