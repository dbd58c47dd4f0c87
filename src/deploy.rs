//! Deploy flow state machine
//!
//! Mirrors the frontend's deploy form: a submission is either idle,
//! processing, or showing the last failure. Submitting while a deployment
//! is in flight is rejected; a failed flow can be resubmitted. On success
//! the flow returns to idle and notifies the registered callback with the
//! new address and the contract descriptor.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::client::ContractClient;
use crate::error::MintError;
use crate::provider::WalletProvider;
use crate::types::{CcdAmount, ContractAddress, ContractInfo};
use crate::Result;

/// Current state of the deploy flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DeployState {
    Idle,
    Processing,
    Failed { message: String },
}

/// Invoked after a successful deployment with the new address and the
/// descriptor it was deployed from.
pub type DeployCallback = Box<dyn Fn(ContractAddress, &ContractInfo) + Send + Sync>;

pub struct DeployFlow<P> {
    client: ContractClient<P>,
    state: Mutex<DeployState>,
    on_deployed: Option<DeployCallback>,
}

impl<P: WalletProvider> DeployFlow<P> {
    pub fn new(client: ContractClient<P>) -> Self {
        Self {
            client,
            state: Mutex::new(DeployState::Idle),
            on_deployed: None,
        }
    }

    /// Register the success callback.
    pub fn on_deployed(
        mut self,
        callback: impl Fn(ContractAddress, &ContractInfo) + Send + Sync + 'static,
    ) -> Self {
        self.on_deployed = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> DeployState {
        self.state.lock().expect("deploy state lock poisoned").clone()
    }

    pub fn client(&self) -> &ContractClient<P> {
        &self.client
    }

    /// Submit a deployment.
    ///
    /// Moves idle (or failed) to processing for the duration of the
    /// call. Success returns to idle and fires the callback; failure
    /// lands in [`DeployState::Failed`] with the error message, ready for
    /// resubmission.
    pub async fn submit(
        &self,
        info: &ContractInfo,
        sender: &str,
        params: &Value,
        max_energy: u64,
        amount: CcdAmount,
    ) -> Result<ContractAddress> {
        {
            let mut state = self.state.lock().expect("deploy state lock poisoned");
            if *state == DeployState::Processing {
                return Err(MintError::DeployInProgress);
            }
            *state = DeployState::Processing;
        }

        match self
            .client
            .init_contract(info, sender, params, max_energy, amount)
            .await
        {
            Ok(address) => {
                *self.state.lock().expect("deploy state lock poisoned") = DeployState::Idle;
                if let Some(callback) = &self.on_deployed {
                    callback(address, info);
                }
                Ok(address)
            }
            Err(err) => {
                *self.state.lock().expect("deploy state lock poisoned") = DeployState::Failed {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_with_tag_and_message() {
        let failed = DeployState::Failed {
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");

        assert_eq!(
            serde_json::to_value(DeployState::Idle).unwrap()["state"],
            "idle"
        );
    }
}
