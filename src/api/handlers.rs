//! Axum handlers for the deploy form and contract operations

use axum::{extract::State, Json};
use std::sync::Arc;

use super::types::{
    InitContractRequest, InitContractResponse, UpdateContractRequest, UpdateContractResponse,
};
use crate::config::AppConfig;
use crate::deploy::{DeployFlow, DeployState};
use crate::error::MintError;
use crate::provider::JsonRpcWalletProvider;
use crate::types::CcdAmount;

/// Shared application state.
pub struct AppState {
    pub flow: DeployFlow<JsonRpcWalletProvider>,
    pub config: AppConfig,
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Deploy form submission: drives the deploy flow and answers with the
/// new contract address once the init transaction finalizes.
pub async fn init_contract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitContractRequest>,
) -> Result<Json<InitContractResponse>, MintError> {
    let info = req.contract.into_contract_info()?;
    let max_energy = req.max_energy.unwrap_or(state.config.max_energy);

    let address = state
        .flow
        .submit(
            &info,
            &req.sender,
            &req.params,
            max_energy,
            CcdAmount::from_ccd(req.amount_ccd),
        )
        .await?;

    Ok(Json(InitContractResponse {
        contract_name: info.contract_name,
        address,
    }))
}

/// Current deploy flow state, for the form to render progress or the
/// last failure.
pub async fn deploy_state_handler(State(state): State<Arc<AppState>>) -> Json<DeployState> {
    Json(state.flow.state())
}

pub async fn update_contract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateContractRequest>,
) -> Result<Json<UpdateContractResponse>, MintError> {
    let info = req.contract.into_contract_info()?;
    let max_energy = req.max_energy.unwrap_or(state.config.max_energy);
    let receive_name = info.receive_name(&req.entrypoint);

    let outcomes = state
        .flow
        .client()
        .update_contract(
            &info,
            &req.params,
            &req.sender,
            req.address,
            &req.entrypoint,
            max_energy,
            CcdAmount::from_ccd(req.amount_ccd),
        )
        .await?;

    Ok(Json(UpdateContractResponse {
        receive_name,
        outcomes,
    }))
}
