//! Chain and wallet wire types
//!
//! These types match the JSON shapes exchanged with the wallet provider,
//! so responses can be consumed transparently. Byte payloads travel as
//! hex strings, amounts as micro-CCD integers.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::MintError;

/// Micro-CCD per CCD.
pub const MICRO_CCD_PER_CCD: u64 = 1_000_000;

/// An amount of CCD, stored in micro-CCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CcdAmount(u64);

impl CcdAmount {
    /// Amount from whole CCD. Saturates at the u64 ceiling.
    pub fn from_ccd(ccd: u64) -> Self {
        Self(ccd.saturating_mul(MICRO_CCD_PER_CCD))
    }

    pub fn from_micro_ccd(micro: u64) -> Self {
        Self(micro)
    }

    pub fn micro_ccd(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CcdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} µCCD", self.0)
    }
}

/// Address of a deployed contract instance: (index, subindex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractAddress {
    pub index: u64,
    pub subindex: u64,
}

impl ContractAddress {
    pub fn new(index: u64, subindex: u64) -> Self {
        Self { index, subindex }
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.index, self.subindex)
    }
}

/// Hash of a deployed contract code module (32 bytes, hex-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleReference(String);

impl ModuleReference {
    pub fn new(hash: impl Into<String>) -> Result<Self, MintError> {
        let hash = hash.into();
        if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MintError::InvalidModuleReference(hash));
        }
        Ok(Self(hash.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash identifying a submitted transaction (32 bytes, hex-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    pub fn new(hash: impl Into<String>) -> Result<Self, MintError> {
        let hash = hash.into();
        if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MintError::InvalidTransactionHash(hash));
        }
        Ok(Self(hash.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static descriptor of a deployable CIS2 contract type.
#[derive(Debug, Clone)]
pub struct ContractInfo {
    /// Binary module schema (see [`crate::schema`]).
    pub schema: Vec<u8>,
    /// Contract name, used as init name and receive-name prefix.
    pub contract_name: String,
    /// Module the contract is instantiated from.
    pub module_ref: ModuleReference,
    /// Width of token ids minted by this contract.
    pub token_id_byte_size: usize,
}

impl ContractInfo {
    /// Schema blob in the base64 form the wallet expects.
    pub fn schema_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.schema)
    }

    /// Qualified entry point name: `ContractName.method`.
    pub fn receive_name(&self, entrypoint: &str) -> String {
        format!("{}.{}", self.contract_name, entrypoint)
    }
}

/// Account transaction kinds this client submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    InitContract,
    Update,
}

/// Payload for instantiating a contract from a deployed module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitContractPayload {
    pub amount: CcdAmount,
    pub module_ref: ModuleReference,
    pub init_name: String,
    #[serde(with = "serde_hex")]
    pub param: Vec<u8>,
    pub max_contract_execution_energy: u64,
}

/// Payload for invoking an entry point on a deployed contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractPayload {
    pub max_contract_execution_energy: u64,
    pub address: ContractAddress,
    #[serde(with = "serde_hex")]
    pub message: Vec<u8>,
    pub amount: CcdAmount,
    pub receive_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionPayload {
    Init(InitContractPayload),
    Update(UpdateContractPayload),
}

/// Lifecycle of a submitted transaction as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Received,
    Committed,
    Finalized,
}

/// Block hash → transaction summary, as returned for finalized
/// transactions. BTreeMap keeps iteration order deterministic, which the
/// reject-reason aggregation relies on.
pub type OutcomeMap = BTreeMap<String, TransactionSummary>;

/// Status query response: current status plus, once available, the
/// per-block outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatusResponse {
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<OutcomeMap>,
}

/// Summary of one transaction in one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub result: TransactionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TransactionResult {
    Success { events: Vec<ContractEvent> },
    Reject { reject_reason: RejectReason },
}

/// Reason a transaction was rejected, identified by its tag
/// (e.g. `RejectedInit`, `OutOfEnergy`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectReason {
    pub tag: String,
}

/// Event tag emitted when a contract instance is created.
pub const CONTRACT_INITIALIZED_TAG: &str = "ContractInitialized";

/// Event emitted by a successful transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEvent {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<ContractAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<serde_json::Value>,
}

impl ContractEvent {
    pub fn contract_initialized(address: ContractAddress) -> Self {
        Self {
            tag: CONTRACT_INITIALIZED_TAG.to_string(),
            address: Some(address),
            contents: None,
        }
    }
}

/// Hex transport for byte payloads in wallet JSON.
mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_ccd_is_two_million_micro() {
        assert_eq!(CcdAmount::from_ccd(2).micro_ccd(), 2_000_000);
    }

    #[test]
    fn zero_ccd_is_zero_micro() {
        assert_eq!(CcdAmount::from_ccd(0), CcdAmount::from_micro_ccd(0));
    }

    #[test]
    fn module_reference_requires_64_hex_chars() {
        assert!(ModuleReference::new("ab".repeat(32)).is_ok());
        assert!(ModuleReference::new("xyz").is_err());
        assert!(ModuleReference::new("gg".repeat(32)).is_err());
    }

    #[test]
    fn receive_name_is_qualified() {
        let info = ContractInfo {
            schema: vec![],
            contract_name: "CIS2-NFT".to_string(),
            module_ref: ModuleReference::new("00".repeat(32)).unwrap(),
            token_id_byte_size: 4,
        };
        assert_eq!(info.receive_name("mint"), "CIS2-NFT.mint");
    }

    #[test]
    fn init_payload_serializes_param_as_hex() {
        let payload = InitContractPayload {
            amount: CcdAmount::from_micro_ccd(0),
            module_ref: ModuleReference::new("aa".repeat(32)).unwrap(),
            init_name: "CIS2-NFT".to_string(),
            param: vec![0xde, 0xad],
            max_contract_execution_energy: 9999,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["param"], "dead");
        assert_eq!(json["initName"], "CIS2-NFT");
    }

    #[test]
    fn summary_json_round_trips_tagged_outcome() {
        let json = serde_json::json!({
            "result": {
                "outcome": "reject",
                "reject_reason": { "tag": "OutOfEnergy" }
            }
        });
        let summary: TransactionSummary = serde_json::from_value(json).unwrap();
        match summary.result {
            TransactionResult::Reject { reject_reason } => {
                assert_eq!(reject_reason.tag, "OutOfEnergy")
            }
            _ => panic!("expected reject"),
        }
    }
}
