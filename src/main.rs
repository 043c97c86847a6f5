use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use coindeck::market::worker;
use coindeck::wallet::rpc::RpcWalletProvider;
use coindeck::wallet::provider::WalletProvider;
use coindeck::{Config, MarketCache, MarketClient, Notice, NoticeHub, WalletSessionManager};

/// Provider→session event channel buffer. Wallet notifications are rare;
/// a small buffer is plenty.
const WALLET_EVENT_BUFFER: usize = 64;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    if config.metrics_enabled {
        coindeck::metrics::init_metrics_server();
    }

    info!("coindeck starting");

    let notices = NoticeHub::new();
    // Mirror every notice into the log — the daemon's stand-in for toasts.
    notices.subscribe(|n: &Notice| info!(level = ?n.level, "{}", n.message));

    let provider: Option<Arc<dyn WalletProvider>> = match &config.wallet_rpc_url {
        Some(url) => match RpcWalletProvider::new(url.clone()) {
            Ok(p) => Some(Arc::new(p)),
            Err(err) => {
                warn!(error = %err, "wallet RPC provider unavailable, running wallet-less");
                None
            }
        },
        None => None,
    };

    let session = Arc::new(
        WalletSessionManager::new(provider, notices.clone()).with_reload_hook(|chain_id| {
            // In the browser this would be a full page reload; the daemon
            // just tells the operator to restart against the new network.
            warn!(chain_id, "chain changed, restart to pick up new network bindings");
        }),
    );
    session.initialize().await;

    let (wallet_tx, wallet_rx) = mpsc::channel(WALLET_EVENT_BUFFER);
    // Held for the lifetime of main: an embedding host clones this sender to
    // feed accountsChanged/chainChanged notifications into the session.
    let _wallet_tx = wallet_tx;

    // Cheap to clone (just an Arc bump), shared by all three pollers
    let cache = MarketCache::new(Config::default_watchlist());
    let client = MarketClient::new(config.api_base.clone())?;

    let markets_handle = tokio::spawn(worker::run_markets_poller(
        client.clone(),
        cache.clone(),
        config.markets_interval,
    ));
    let global_handle = tokio::spawn(worker::run_global_poller(
        client.clone(),
        cache.clone(),
        config.global_interval,
    ));
    let trending_handle = tokio::spawn(worker::run_trending_poller(
        client,
        cache.clone(),
        config.trending_interval,
    ));
    let session_handle = tokio::spawn(session.clone().run_event_loop(wallet_rx));

    tokio::select! {
        res = markets_handle => {
            match res {
                Ok(Ok(())) => warn!("markets poller exited"),
                Ok(Err(err)) => warn!(error = %err, "markets poller returned error"),
                Err(err) => warn!(error = %err, "markets poller task panicked"),
            }
        }
        res = global_handle => {
            match res {
                Ok(Ok(())) => warn!("global poller exited"),
                Ok(Err(err)) => warn!(error = %err, "global poller returned error"),
                Err(err) => warn!(error = %err, "global poller task panicked"),
            }
        }
        res = trending_handle => {
            match res {
                Ok(Ok(())) => warn!("trending poller exited"),
                Ok(Err(err)) => warn!(error = %err, "trending poller returned error"),
                Err(err) => warn!(error = %err, "trending poller task panicked"),
            }
        }
        res = session_handle => {
            match res {
                Ok(Ok(())) => warn!("wallet event loop exited"),
                Ok(Err(err)) => warn!(error = %err, "wallet event loop returned error"),
                Err(err) => warn!(error = %err, "wallet event loop task panicked"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
