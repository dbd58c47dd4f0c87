//! Contract client
//!
//! [`ContractClient`] composes the schema serializer, the wallet provider
//! and the outcome helpers into the two chain operations this service
//! performs: initialize a contract instance and invoke an entry point on
//! one. Both submit a transaction, then poll until it finalizes.
//!
//! There is no retry and no cancellation. A failure at any step aborts
//! the operation and surfaces as an error on the call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;

use crate::error::MintError;
use crate::outcome::{ensure_valid_outcome, parse_contract_address};
use crate::provider::WalletProvider;
use crate::schema::{serialize_init_params, serialize_update_params, SCHEMA_VERSION};
use crate::types::{
    CcdAmount, ContractAddress, ContractInfo, InitContractPayload, OutcomeMap, TransactionHash,
    TransactionPayload, TransactionStatus, TransactionType, UpdateContractPayload,
};
use crate::Result;

/// Fixed delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling attempt budget. The wallet or node going silent must not leave
/// a poll loop running forever.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Default execution energy cap for init and update transactions.
pub const DEFAULT_MAX_ENERGY: u64 = 9_999;

/// Client for deploying and invoking contracts through a wallet provider.
pub struct ContractClient<P> {
    provider: Arc<P>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl<P: WalletProvider> ContractClient<P> {
    /// Client with the default polling policy (1s interval, 60 attempts).
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_polling(provider, DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLL_ATTEMPTS)
    }

    pub fn with_polling(provider: Arc<P>, poll_interval: Duration, max_poll_attempts: u32) -> Self {
        Self {
            provider,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Initialize a contract instance from `info`'s module.
    ///
    /// Serializes `params` against the contract's init schema, submits an
    /// init transaction, waits for finalization, validates the outcome and
    /// returns the created contract's address.
    pub async fn init_contract(
        &self,
        info: &ContractInfo,
        sender: &str,
        params: &Value,
        max_energy: u64,
        amount: CcdAmount,
    ) -> Result<ContractAddress> {
        let serialized = serialize_init_params(&info.schema, &info.contract_name, params)?;

        log::info!(
            "Initializing contract {} from module {}",
            info.contract_name,
            info.module_ref
        );

        let payload = InitContractPayload {
            amount,
            module_ref: info.module_ref.clone(),
            init_name: info.contract_name.clone(),
            param: serialized,
            max_contract_execution_energy: max_energy,
        };
        let hash = self
            .provider
            .send_transaction(
                sender,
                TransactionType::InitContract,
                TransactionPayload::Init(payload),
                params,
                &info.schema_base64(),
                SCHEMA_VERSION,
            )
            .await?;

        let outcomes = self.wait_for_finalization(&hash).await?;
        let outcomes = ensure_valid_outcome(outcomes)?;
        let address = parse_contract_address(&outcomes)?;

        log::info!("Contract {} initialized at {}", info.contract_name, address);
        Ok(address)
    }

    /// Invoke `entrypoint` on a deployed contract instance.
    ///
    /// Serializes `params` against the entry point's receive schema,
    /// submits an update transaction, waits for finalization and returns
    /// the validated outcome map.
    pub async fn update_contract(
        &self,
        info: &ContractInfo,
        params: &Value,
        sender: &str,
        address: ContractAddress,
        entrypoint: &str,
        max_energy: u64,
        amount: CcdAmount,
    ) -> Result<OutcomeMap> {
        let message =
            serialize_update_params(&info.schema, &info.contract_name, entrypoint, params)?;
        let receive_name = info.receive_name(entrypoint);

        log::info!("Calling {} on {}", receive_name, address);

        let payload = UpdateContractPayload {
            max_contract_execution_energy: max_energy,
            address,
            message,
            amount,
            receive_name,
        };
        let hash = self
            .provider
            .send_transaction(
                sender,
                TransactionType::Update,
                TransactionPayload::Update(payload),
                params,
                &info.schema_base64(),
                SCHEMA_VERSION,
            )
            .await?;

        let outcomes = self.wait_for_finalization(&hash).await?;
        ensure_valid_outcome(outcomes)
    }

    /// Poll transaction status until it reaches `Finalized`.
    ///
    /// Sleeps the poll interval before each query, matching the wallet's
    /// own cadence. Errors when the status query fails, when the node
    /// reports no status for the hash, or when the attempt budget runs
    /// out.
    pub async fn wait_for_finalization(&self, hash: &TransactionHash) -> Result<Option<OutcomeMap>> {
        for attempt in 1..=self.max_poll_attempts {
            sleep(self.poll_interval).await;

            let status = self
                .provider
                .get_transaction_status(hash)
                .await?
                .ok_or_else(|| MintError::StatusMissing(hash.clone()))?;

            log::info!(
                "txn {}: status {:?} (poll {}/{})",
                hash,
                status.status,
                attempt,
                self.max_poll_attempts
            );

            if status.status == TransactionStatus::Finalized {
                return Ok(status.outcomes);
            }
        }

        Err(MintError::PollTimeout {
            hash: hash.clone(),
            attempts: self.max_poll_attempts,
        })
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}
