//! Wallet session lifecycle.
//!
//! Single authoritative source of connection state for the whole process.
//! Every provider interaction is best-effort: absence, rejection and RPC
//! failures leave the session in a well-defined state and surface only as
//! transient notices.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use crate::metrics;
use crate::notice::{Notice, NoticeHub};
use crate::wallet::error::SessionError;
use crate::wallet::provider::{WalletEvent, WalletProvider};

const WEI_PER_ETH: f64 = 1e18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Snapshot of the current session, cheap to clone out to consumers.
///
/// Invariant: `connection == Connected` iff `address.is_some()`.
#[derive(Clone, Debug)]
pub struct WalletSession {
    pub address: Option<String>,
    pub balance_wei: Option<u128>,
    pub chain_id: Option<u64>,
    pub connection: ConnectionState,
}

impl WalletSession {
    fn disconnected() -> Self {
        WalletSession {
            address: None,
            balance_wei: None,
            chain_id: None,
            connection: ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Native balance rendered in ether with four decimals, the way the
    /// dashboard displays it.
    pub fn balance_eth(&self) -> Option<String> {
        self.balance_wei
            .map(|wei| format!("{:.4}", wei as f64 / WEI_PER_ETH))
    }
}

type ReloadHook = Box<dyn Fn(u64) + Send + Sync>;

/// Owns the session state machine. One instance per process, shared via Arc;
/// consumers read snapshots and mutate only through the operations below.
pub struct WalletSessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    state: RwLock<WalletSession>,
    /// Bumped on every transition that invalidates in-flight fetches.
    /// Late results carrying an older generation are discarded.
    generation: AtomicU64,
    notices: NoticeHub,
    reload_hook: Option<ReloadHook>,
}

impl WalletSessionManager {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, notices: NoticeHub) -> Self {
        WalletSessionManager {
            provider,
            state: RwLock::new(WalletSession::disconnected()),
            generation: AtomicU64::new(0),
            notices,
            reload_hook: None,
        }
    }

    /// Install the host's page-reload handler, invoked on `chainChanged`.
    /// The reload itself is a wallet-provider recommendation the session
    /// manager relays, not something it performs.
    pub fn with_reload_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.reload_hook = Some(Box::new(hook));
        self
    }

    pub async fn session(&self) -> WalletSession {
        self.state.read().await.clone()
    }

    /// Silent best-effort restore of an already-authorized session.
    /// Never prompts, never surfaces a notice on failure.
    pub async fn initialize(&self) {
        let Some(provider) = self.provider.clone() else {
            debug!("no wallet provider, session stays disconnected");
            return;
        };

        match provider.authorized_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                let address = accounts[0].clone();
                info!(address = %address, "restored wallet session");
                let generation = self.become_connected(address.clone()).await;
                self.refresh_balance(&address, generation).await;
                self.refresh_chain_id(generation).await;
            }
            Ok(_) => debug!("no authorized accounts to restore"),
            Err(err) => debug!(error = %err, "session restore failed"),
        }
    }

    /// Prompt-for-authorization connect. A second call while `Connecting`
    /// is a no-op; all failure paths revert to `Disconnected` and publish
    /// an error notice.
    pub async fn connect(&self) {
        let Some(provider) = self.provider.clone() else {
            self.notices
                .publish(Notice::error("No wallet provider detected"));
            return;
        };

        {
            let mut state = self.state.write().await;
            if state.connection == ConnectionState::Connecting {
                debug!("connect already in flight, ignoring");
                return;
            }
            *state = WalletSession::disconnected();
            state.connection = ConnectionState::Connecting;
        }

        match provider.request_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                let address = accounts[0].clone();
                info!(address = %address, "wallet connected");
                metrics::record_wallet_connect("ok");
                let generation = self.become_connected(address.clone()).await;
                self.notices
                    .publish(Notice::success("Wallet connected successfully"));
                self.refresh_balance(&address, generation).await;
                self.refresh_chain_id(generation).await;
            }
            Ok(_) => {
                warn!("provider returned no accounts");
                metrics::record_wallet_connect("err");
                self.revert_to_disconnected().await;
                self.notices.publish(Notice::error("Failed to connect wallet"));
            }
            Err(SessionError::UserRejected) => {
                info!("wallet connection rejected by user");
                metrics::record_wallet_connect("rejected");
                self.revert_to_disconnected().await;
                self.notices
                    .publish(Notice::error("Wallet connection rejected"));
            }
            Err(err) => {
                warn!(error = %err, "wallet connect failed");
                metrics::record_wallet_connect("err");
                self.revert_to_disconnected().await;
                self.notices.publish(Notice::error("Failed to connect wallet"));
            }
        }
    }

    /// Local-only teardown; injected wallets expose no revocation call.
    /// Always succeeds.
    pub async fn disconnect(&self) {
        {
            let mut state = self.state.write().await;
            *state = WalletSession::disconnected();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!("wallet disconnected");
        self.notices.publish(Notice::success("Wallet disconnected"));
    }

    /// Drain provider notifications. Runs until the sending side closes.
    pub async fn run_event_loop(
        self: Arc<Self>,
        mut rx: mpsc::Receiver<WalletEvent>,
    ) -> anyhow::Result<()> {
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }
        Ok(())
    }

    pub async fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                self.on_accounts_changed(accounts).await
            }
            WalletEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id).await,
        }
    }

    async fn on_accounts_changed(&self, accounts: Vec<String>) {
        match accounts.first() {
            None => {
                debug!("accounts changed to empty, tearing down session");
                self.disconnect().await;
            }
            Some(address) => {
                let address = address.clone();
                info!(address = %address, "active account changed");
                let generation = self.become_connected(address.clone()).await;
                self.refresh_balance(&address, generation).await;
            }
        }
    }

    async fn on_chain_changed(&self, chain_id: u64) {
        {
            let mut state = self.state.write().await;
            state.chain_id = Some(chain_id);
        }
        info!(chain_id, "chain changed, host reload requested");
        if let Some(hook) = &self.reload_hook {
            hook(chain_id);
        }
    }

    /// Swap to a connected session for `address` and return the generation
    /// that in-flight refreshes for it must carry.
    async fn become_connected(&self, address: String) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.address = Some(address);
        state.balance_wei = None;
        state.connection = ConnectionState::Connected;
        generation
    }

    async fn revert_to_disconnected(&self) {
        let mut state = self.state.write().await;
        *state = WalletSession::disconnected();
    }

    /// Fetch and apply the native balance, unless the session moved on while
    /// the request was in flight — stale results are dropped, not reported.
    async fn refresh_balance(&self, address: &str, generation: u64) {
        let Some(provider) = self.provider.clone() else {
            return;
        };

        let fetched = provider.balance_wei(address).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(address = %address, "discarding stale balance result");
            return;
        }

        match fetched {
            Ok(wei) => {
                let mut state = self.state.write().await;
                // Re-check under the lock: the guard and the apply must see
                // the same session.
                if state.address.as_deref() == Some(address) {
                    state.balance_wei = Some(wei);
                }
            }
            Err(err) => debug!(error = %err, "balance refresh failed"),
        }
    }

    async fn refresh_chain_id(&self, generation: u64) {
        let Some(provider) = self.provider.clone() else {
            return;
        };

        let fetched = provider.chain_id().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale chain id result");
            return;
        }

        match fetched {
            Ok(chain_id) => {
                let mut state = self.state.write().await;
                if state.is_connected() {
                    state.chain_id = Some(chain_id);
                }
            }
            Err(err) => debug!(error = %err, "chain id refresh failed"),
        }
    }
}
