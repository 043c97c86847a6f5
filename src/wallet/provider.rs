use async_trait::async_trait;

use crate::wallet::error::SessionError;

/// Asynchronous notification pushed by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The authorized account list changed. Empty means the user revoked
    /// access from the wallet side.
    AccountsChanged(Vec<String>),
    /// The wallet switched networks.
    ChainChanged(u64),
}

/// Seam over the externally provided wallet capability object.
///
/// Mirrors the injected `request({method, params})` surface: `eth_accounts`,
/// `eth_requestAccounts`, `eth_chainId`, `eth_getBalance`. Absence of a
/// provider is modeled as `Option::<Arc<dyn WalletProvider>>::None` by the
/// session manager, not as an implementation of this trait.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this origin. Never prompts.
    async fn authorized_accounts(&self) -> Result<Vec<String>, SessionError>;

    /// Request account authorization. May prompt the user, who can reject.
    async fn request_accounts(&self) -> Result<Vec<String>, SessionError>;

    /// Current network id.
    async fn chain_id(&self) -> Result<u64, SessionError>;

    /// Native balance of `address` in wei, at the latest block.
    async fn balance_wei(&self, address: &str) -> Result<u128, SessionError>;
}
