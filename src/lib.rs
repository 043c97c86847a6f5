//! coindeck — headless backend for a crypto dashboard.
//!
//! Two process-wide managers back every consumer: the wallet session
//! manager (connection lifecycle for an externally provided wallet) and the
//! market data cache (fixed-interval polling of a watch-set against the
//! CoinGecko API). Both are constructed once at startup and shared by
//! reference; consumers mutate only through their documented operations.

pub mod config;
pub mod market;
pub mod metrics;
pub mod notice;
pub mod wallet;

pub use config::Config;
pub use market::cache::MarketCache;
pub use market::client::MarketClient;
pub use market::types::{FetchState, MarketSnapshot};
pub use notice::{Notice, NoticeHub, NoticeLevel, NoticeToken};
pub use wallet::provider::{WalletEvent, WalletProvider};
pub use wallet::session::{ConnectionState, WalletSession, WalletSessionManager};
