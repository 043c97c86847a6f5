//! HTTP JSON-RPC wallet provider.
//!
//! Lets the daemon talk to any Ethereum-compatible RPC endpoint with the
//! same method surface a browser-injected wallet exposes. A bare RPC node
//! has no approval UI, so `eth_requestAccounts` degrades to `eth_accounts`;
//! a wallet-style endpoint that does prompt reports rejection with the
//! standard 4001 error code, which maps to `UserRejected`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::wallet::error::SessionError;
use crate::wallet::provider::WalletProvider;

const USER_REJECTED_CODE: i64 = 4001;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RpcWalletProvider {
    http: reqwest::Client,
    url: String,
}

impl RpcWalletProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SessionError::NetworkFailure(e.to_string()))?;
        Ok(RpcWalletProvider { http, url: url.into() })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, SessionError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.error {
            if err.code == USER_REJECTED_CODE {
                return Err(SessionError::UserRejected);
            }
            return Err(SessionError::NetworkFailure(format!(
                "{method}: {} (code {})",
                err.message, err.code
            )));
        }

        resp.result
            .ok_or_else(|| SessionError::NetworkFailure(format!("{method}: empty result")))
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn authorized_accounts(&self) -> Result<Vec<String>, SessionError> {
        let result = self.request("eth_accounts", json!([])).await?;
        decode_accounts("eth_accounts", result)
    }

    async fn request_accounts(&self) -> Result<Vec<String>, SessionError> {
        let result = self.request("eth_requestAccounts", json!([])).await?;
        decode_accounts("eth_requestAccounts", result)
    }

    async fn chain_id(&self) -> Result<u64, SessionError> {
        let result = self.request("eth_chainId", json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| SessionError::NetworkFailure("eth_chainId: non-string result".into()))?;
        parse_hex_u64(hex)
            .ok_or_else(|| SessionError::NetworkFailure(format!("eth_chainId: bad hex {hex:?}")))
    }

    async fn balance_wei(&self, address: &str) -> Result<u128, SessionError> {
        let result = self
            .request("eth_getBalance", json!([address, "latest"]))
            .await?;
        let hex = result.as_str().ok_or_else(|| {
            SessionError::NetworkFailure("eth_getBalance: non-string result".into())
        })?;
        parse_hex_u128(hex)
            .ok_or_else(|| SessionError::NetworkFailure(format!("eth_getBalance: bad hex {hex:?}")))
    }
}

fn decode_accounts(method: &str, result: Value) -> Result<Vec<String>, SessionError> {
    serde_json::from_value(result)
        .map_err(|e| SessionError::NetworkFailure(format!("{method}: {e}")))
}

fn parse_hex_u64(hex: &str) -> Option<u64> {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok()
}

fn parse_hex_u128(hex: &str) -> Option<u128> {
    u128::from_str_radix(hex.trim_start_matches("0x"), 16).ok()
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_quantities_parse_with_and_without_prefix() {
        assert_eq!(parse_hex_u64("0x1"), Some(1));
        assert_eq!(parse_hex_u64("0x89"), Some(137));
        assert_eq!(parse_hex_u128("0xde0b6b3a7640000"), Some(1_000_000_000_000_000_000));
        assert_eq!(parse_hex_u64("0xzz"), None);
    }

    #[test]
    fn rejection_code_maps_to_user_rejected() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#;
        let resp: RpcResponse = serde_json::from_str(raw).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, USER_REJECTED_CODE);
    }
}
