//! cis2-mint: CIS2 contract deployment through a wallet provider
//!
//! This crate deploys and invokes CIS2 smart contracts on a
//! Concordium-style chain through an external wallet provider, which
//! owns accounts, keys and transaction signing.
//!
//! # Architecture
//!
//! - **Schema serializer**: encodes JSON parameters against a contract's
//!   module schema, rejecting shape mismatches before submission
//! - **Contract client**: submits init/update payloads through the
//!   wallet, polls for finalization and validates outcomes
//! - **Deploy flow**: the frontend form's idle/processing/failed state
//!   machine, exposed over an axum HTTP API
//!
//! # Example
//!
//! ```ignore
//! use cis2_mint::{ContractClient, JsonRpcWalletProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(JsonRpcWalletProvider::new("http://localhost:9095"));
//! let client = ContractClient::new(provider);
//!
//! let address = client
//!     .init_contract(
//!         &contract_info,
//!         sender_account,
//!         &serde_json::json!({ "verify_key": verify_key }),
//!         9_999,
//!         CcdAmount::from_ccd(0),
//!     )
//!     .await?;
//! ```

// Public modules
pub mod api;
pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
pub mod outcome;
pub mod provider;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use client::{
    ContractClient, DEFAULT_MAX_ENERGY, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use config::AppConfig;
pub use deploy::{DeployFlow, DeployState};
pub use error::MintError;
pub use outcome::{ensure_valid_outcome, parse_contract_address};
pub use provider::{JsonRpcWalletProvider, WalletProvider};
pub use schema::{ModuleSchema, SchemaType, SCHEMA_VERSION};
pub use types::{
    CcdAmount, ContractAddress, ContractEvent, ContractInfo, InitContractPayload, ModuleReference,
    OutcomeMap, TransactionHash, TransactionPayload, TransactionResult, TransactionStatus,
    TransactionStatusResponse, TransactionSummary, TransactionType, UpdateContractPayload,
};

// Common result type
pub type Result<T> = std::result::Result<T, MintError>;
