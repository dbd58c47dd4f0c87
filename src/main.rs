use std::sync::Arc;

use cis2_mint::api::handlers::AppState;
use cis2_mint::api::server;
use cis2_mint::{AppConfig, ContractClient, DeployFlow, JsonRpcWalletProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    let provider = Arc::new(JsonRpcWalletProvider::new(config.wallet_rpc_url.clone()));
    let client =
        ContractClient::with_polling(provider, config.poll_interval, config.max_poll_attempts);
    let flow = DeployFlow::new(client).on_deployed(|address, info| {
        log::info!("Contract {} deployed at {}", info.contract_name, address);
    });

    let addr = config.bind_address.clone();
    let state = Arc::new(AppState { flow, config });

    log::info!("Starting CIS2 mint API on {}", addr);
    server::start_server(&addr, state).await?;
    Ok(())
}
