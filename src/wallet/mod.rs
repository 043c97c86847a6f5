pub mod chains;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod session;
