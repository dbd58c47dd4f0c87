//! Error types for contract deployment and invocation
//!
//! One error enum covers the whole pipeline: schema serialization,
//! wallet submission, finalization polling and outcome parsing.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::TransactionHash;

#[derive(Error, Debug)]
pub enum MintError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid module reference: {0}")]
    InvalidModuleReference(String),

    #[error("Invalid transaction hash: {0}")]
    InvalidTransactionHash(String),

    #[error("Wallet provider error: {0}")]
    Provider(String),

    #[error("Wallet RPC error: {0}")]
    Rpc(#[from] reqwest::Error),

    /// The status query answered, but with no status at all.
    #[error("Transaction status is missing for {0}")]
    StatusMissing(TransactionHash),

    /// A finalized transaction carried no outcome map.
    #[error("Transaction has no outcome")]
    OutcomeMissing,

    /// Every outcome entry was a rejection. Carries the comma-joined
    /// reject reason tags.
    #[error("Transaction failed, reasons: {0}")]
    TransactionRejected(String),

    #[error("No ContractInitialized event found in transaction outcomes")]
    AddressMissing,

    #[error("Transaction {hash} not finalized after {attempts} polls")]
    PollTimeout {
        hash: TransactionHash,
        attempts: u32,
    },

    #[error("A deployment is already in progress")]
    DeployInProgress,
}

impl IntoResponse for MintError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            MintError::Schema(_)
            | MintError::InvalidModuleReference(_)
            | MintError::InvalidTransactionHash(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            MintError::DeployInProgress => (StatusCode::CONFLICT, self.to_string()),
            MintError::TransactionRejected(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            MintError::Rpc(_) | MintError::Provider(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            MintError::PollTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
