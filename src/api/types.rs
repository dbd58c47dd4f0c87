//! API request and response types

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MintError;
use crate::types::{ContractAddress, ContractInfo, ModuleReference, OutcomeMap};
use crate::Result;

fn default_token_id_byte_size() -> usize {
    4
}

/// Contract descriptor as supplied by the frontend: the module schema
/// travels base64-encoded, the module reference as hex.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractDescriptor {
    pub contract_name: String,
    pub module_ref: String,
    pub schema_base64: String,
    #[serde(default = "default_token_id_byte_size")]
    pub token_id_byte_size: usize,
}

impl ContractDescriptor {
    pub fn into_contract_info(self) -> Result<ContractInfo> {
        let schema = base64::engine::general_purpose::STANDARD
            .decode(&self.schema_base64)
            .map_err(|e| MintError::Schema(format!("invalid base64 schema: {}", e)))?;
        Ok(ContractInfo {
            schema,
            contract_name: self.contract_name,
            module_ref: ModuleReference::new(self.module_ref)?,
            token_id_byte_size: self.token_id_byte_size,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct InitContractRequest {
    pub sender: String,
    pub contract: ContractDescriptor,
    /// Init parameters, validated against the contract schema.
    #[serde(default)]
    pub params: Value,
    /// CCD to seed the instance with.
    #[serde(default)]
    pub amount_ccd: u64,
    /// Optional energy cap override.
    pub max_energy: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct InitContractResponse {
    pub contract_name: String,
    pub address: ContractAddress,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContractRequest {
    pub sender: String,
    pub contract: ContractDescriptor,
    pub address: ContractAddress,
    pub entrypoint: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub amount_ccd: u64,
    pub max_energy: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateContractResponse {
    pub receive_name: String,
    pub outcomes: OutcomeMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_decodes_schema_and_validates_module_ref() {
        let descriptor = ContractDescriptor {
            contract_name: "CIS2-NFT".to_string(),
            module_ref: "AB".repeat(32),
            schema_base64: base64::engine::general_purpose::STANDARD.encode([2, 0, 0, 0, 0]),
            token_id_byte_size: 4,
        };
        let info = descriptor.into_contract_info().unwrap();
        assert_eq!(info.schema, [2, 0, 0, 0, 0]);
        assert_eq!(info.module_ref.as_str(), "ab".repeat(32));
    }

    #[test]
    fn bad_base64_schema_is_rejected() {
        let descriptor = ContractDescriptor {
            contract_name: "CIS2-NFT".to_string(),
            module_ref: "ab".repeat(32),
            schema_base64: "not base64!!".to_string(),
            token_id_byte_size: 4,
        };
        assert!(matches!(
            descriptor.into_contract_info(),
            Err(MintError::Schema(_))
        ));
    }
}
