pub mod cache;
pub mod client;
pub mod format;
pub mod types;
pub mod worker;
