use std::time::Duration;

use crate::market::client::DEFAULT_API_BASE;

/// Watch-set the dashboard ships with before the user edits it.
pub const DEFAULT_WATCHLIST: [&str; 5] =
    ["bitcoin", "ethereum", "binancecoin", "cardano", "solana"];

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_base: String,
    /// Per-asset market data poll interval.
    pub markets_interval: Duration,
    /// Global aggregate stats poll interval.
    pub global_interval: Duration,
    /// Trending list poll interval.
    pub trending_interval: Duration,
    /// Optional Ethereum JSON-RPC endpoint standing in for an injected
    /// wallet. Absent is a normal condition: the daemon runs wallet-less.
    pub wallet_rpc_url: Option<String>,
    pub metrics_enabled: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let api_base = std::env::var("COINDECK_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let wallet_rpc_url = std::env::var("WALLET_RPC_URL").ok();
        let metrics_enabled = std::env::var("COINDECK_METRICS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            log_level,
            api_base,
            markets_interval: interval_from_env("COINDECK_MARKETS_INTERVAL_SECS", 30),
            global_interval: interval_from_env("COINDECK_GLOBAL_INTERVAL_SECS", 60),
            trending_interval: interval_from_env("COINDECK_TRENDING_INTERVAL_SECS", 300),
            wallet_rpc_url,
            metrics_enabled,
        })
    }

    pub fn default_watchlist() -> Vec<String> {
        DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect()
    }
}

fn interval_from_env(var: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}
