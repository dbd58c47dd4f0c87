//! Shared test support: a scripted mock wallet provider and outcome
//! builders.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use cis2_mint::schema::{ContractSchema, ModuleSchema, SchemaType};
use cis2_mint::types::{
    ContractAddress, ContractEvent, ContractInfo, ModuleReference, OutcomeMap, RejectReason,
    TransactionHash, TransactionPayload, TransactionResult, TransactionStatus,
    TransactionStatusResponse, TransactionSummary, TransactionType,
};
use cis2_mint::{MintError, WalletProvider};

/// Everything the mock saw in a `send_transaction` call.
pub struct SentTransaction {
    pub sender: String,
    pub transaction_type: TransactionType,
    pub payload: TransactionPayload,
    pub params: Value,
    pub schema_base64: String,
    pub schema_version: u8,
}

/// Wallet provider driven by a script of status responses.
///
/// Each poll pops the next scripted response; `None` entries model a
/// node that does not know the transaction. When the script runs dry the
/// mock keeps answering `committed`, so poll-budget tests terminate.
pub struct MockWalletProvider {
    statuses: Mutex<VecDeque<Option<TransactionStatusResponse>>>,
    pub sent: Mutex<Vec<SentTransaction>>,
    polls: AtomicU32,
    send_delay: Duration,
}

impl MockWalletProvider {
    pub fn new(statuses: Vec<Option<TransactionStatusResponse>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            sent: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
            send_delay: Duration::ZERO,
        }
    }

    /// Delay every `send_transaction`, to keep a deployment in flight
    /// while the test pokes at it.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn send_transaction(
        &self,
        sender: &str,
        transaction_type: TransactionType,
        payload: TransactionPayload,
        params: &Value,
        schema_base64: &str,
        schema_version: u8,
    ) -> Result<TransactionHash, MintError> {
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(SentTransaction {
            sender: sender.to_string(),
            transaction_type,
            payload,
            params: params.clone(),
            schema_base64: schema_base64.to_string(),
            schema_version,
        });
        TransactionHash::new(format!("{:064x}", sent.len()))
    }

    async fn get_transaction_status(
        &self,
        _hash: &TransactionHash,
    ) -> Result<Option<TransactionStatusResponse>, MintError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| Some(committed())))
    }
}

pub fn committed() -> TransactionStatusResponse {
    TransactionStatusResponse {
        status: TransactionStatus::Committed,
        outcomes: None,
    }
}

pub fn finalized(outcomes: Option<OutcomeMap>) -> TransactionStatusResponse {
    TransactionStatusResponse {
        status: TransactionStatus::Finalized,
        outcomes,
    }
}

pub fn success_outcome(block: &str, events: Vec<ContractEvent>) -> OutcomeMap {
    let mut outcomes = BTreeMap::new();
    outcomes.insert(
        block.to_string(),
        TransactionSummary {
            result: TransactionResult::Success { events },
        },
    );
    outcomes
}

pub fn reject_outcome(entries: &[(&str, &str)]) -> OutcomeMap {
    let mut outcomes = BTreeMap::new();
    for (block, tag) in entries {
        outcomes.insert(
            block.to_string(),
            TransactionSummary {
                result: TransactionResult::Reject {
                    reject_reason: RejectReason {
                        tag: tag.to_string(),
                    },
                },
            },
        );
    }
    outcomes
}

pub fn initialized_at(index: u64, subindex: u64) -> Vec<ContractEvent> {
    vec![ContractEvent::contract_initialized(ContractAddress::new(
        index, subindex,
    ))]
}

/// Descriptor for a CIS2 NFT contract with a `verify_key` init parameter
/// and a `mint` entry point taking an owner plus 4-byte token ids.
pub fn nft_contract_info() -> ContractInfo {
    let mut receive = BTreeMap::new();
    receive.insert(
        "mint".to_string(),
        SchemaType::Struct(vec![
            ("owner".to_string(), SchemaType::String),
            (
                "tokens".to_string(),
                SchemaType::List(Box::new(SchemaType::ByteArray(4))),
            ),
        ]),
    );

    let mut contracts = BTreeMap::new();
    contracts.insert(
        "CIS2-NFT".to_string(),
        ContractSchema {
            init: Some(SchemaType::Struct(vec![(
                "verify_key".to_string(),
                SchemaType::String,
            )])),
            receive,
        },
    );

    ContractInfo {
        schema: ModuleSchema { contracts }.to_bytes(),
        contract_name: "CIS2-NFT".to_string(),
        module_ref: ModuleReference::new("ab".repeat(32)).unwrap(),
        token_id_byte_size: 4,
    }
}

pub const SENDER: &str = "3kBx2h5Y2veb4hZgAJWPrr8RyQESKm5TjzF3ti1QQ4VSYLwK1G";
