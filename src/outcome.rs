//! Transaction outcome validation
//!
//! Pure functions over the outcome map a finalized transaction carries.
//! The client calls these after polling; they are kept free-standing so
//! they can be tested without a provider.

use crate::error::MintError;
use crate::types::{ContractAddress, OutcomeMap, TransactionResult, CONTRACT_INITIALIZED_TAG};
use crate::Result;

/// Check that at least one outcome entry succeeded.
///
/// Returns the map unchanged on success. With no successful entry, fails
/// with the reject reason tags of all rejected entries, comma-joined in
/// map iteration order. `None` fails distinctly: the transaction
/// finalized but the node reported no outcome at all.
pub fn ensure_valid_outcome(outcomes: Option<OutcomeMap>) -> Result<OutcomeMap> {
    let outcomes = outcomes.ok_or(MintError::OutcomeMissing)?;

    let any_success = outcomes
        .values()
        .any(|summary| matches!(summary.result, TransactionResult::Success { .. }));
    if any_success {
        return Ok(outcomes);
    }

    let failures: Vec<&str> = outcomes
        .values()
        .filter_map(|summary| match &summary.result {
            TransactionResult::Reject { reject_reason } => Some(reject_reason.tag.as_str()),
            _ => None,
        })
        .collect();
    Err(MintError::TransactionRejected(failures.join(",")))
}

/// Extract the created contract's address from a validated outcome map.
///
/// Scans successful entries for a `ContractInitialized` event and returns
/// its embedded address. Fails when no such event exists in any outcome.
pub fn parse_contract_address(outcomes: &OutcomeMap) -> Result<ContractAddress> {
    for summary in outcomes.values() {
        if let TransactionResult::Success { events } = &summary.result {
            for event in events {
                if event.tag == CONTRACT_INITIALIZED_TAG {
                    if let Some(address) = event.address {
                        return Ok(address);
                    }
                }
            }
        }
    }

    Err(MintError::AddressMissing)
}
