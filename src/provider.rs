//! Wallet provider boundary
//!
//! The wallet owns accounts, keys and signing; this crate only submits
//! payloads through it and polls the resulting transaction. The seam is
//! the [`WalletProvider`] trait, with a JSON-RPC implementation for a
//! wallet daemon and a scripted mock in the integration tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::MintError;
use crate::types::{
    TransactionHash, TransactionPayload, TransactionStatusResponse, TransactionType,
};
use crate::Result;

/// External wallet capable of signing and submitting account transactions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Submit a signed transaction on behalf of `sender`.
    ///
    /// `params` is the raw JSON parameter object and `schema_base64` the
    /// module schema, both forwarded so the wallet can render a
    /// human-readable approval prompt.
    async fn send_transaction(
        &self,
        sender: &str,
        transaction_type: TransactionType,
        payload: TransactionPayload,
        params: &Value,
        schema_base64: &str,
        schema_version: u8,
    ) -> Result<TransactionHash>;

    /// Query the status of a submitted transaction.
    ///
    /// `None` means the wallet's node does not know the transaction.
    async fn get_transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<Option<TransactionStatusResponse>>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
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

/// [`WalletProvider`] over JSON-RPC 2.0 to a wallet daemon.
pub struct JsonRpcWalletProvider {
    http_client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcWalletProvider {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        log::info!("Wallet RPC endpoint: {}", url);
        Self {
            http_client: reqwest::Client::new(),
            url,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response: RpcResponse = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(MintError::Provider(format!(
                "{} failed: {} (code {})",
                method, error.message, error.code
            )));
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn send_transaction(
        &self,
        sender: &str,
        transaction_type: TransactionType,
        payload: TransactionPayload,
        params: &Value,
        schema_base64: &str,
        schema_version: u8,
    ) -> Result<TransactionHash> {
        let result = self
            .call(
                "sendTransaction",
                json!({
                    "sender": sender,
                    "type": transaction_type,
                    "payload": payload,
                    "parameters": params,
                    "schema": schema_base64,
                    "schemaVersion": schema_version,
                }),
            )
            .await?;

        let hash = result
            .as_str()
            .ok_or_else(|| {
                MintError::Provider(format!("sendTransaction returned non-string: {}", result))
            })?
            .to_string();
        TransactionHash::new(hash)
    }

    async fn get_transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<Option<TransactionStatusResponse>> {
        let result = self
            .call("getTransactionStatus", json!({ "transactionHash": hash }))
            .await?;

        if result.is_null() {
            return Ok(None);
        }
        let status: TransactionStatusResponse = serde_json::from_value(result)
            .map_err(|e| MintError::Provider(format!("malformed transaction status: {}", e)))?;
        Ok(Some(status))
    }
}
