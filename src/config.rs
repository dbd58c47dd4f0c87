//! Service configuration from environment variables
//!
//! Controls the bind address, the wallet RPC endpoint and the polling
//! policy. Every knob has a logged default so the service runs with no
//! environment at all.

use std::env;
use std::time::Duration;

use crate::client::{DEFAULT_MAX_ENERGY, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address the HTTP API binds to.
    pub bind_address: String,
    /// Wallet daemon JSON-RPC endpoint.
    pub wallet_rpc_url: String,
    /// Delay between transaction status polls.
    pub poll_interval: Duration,
    /// Poll attempts before giving up on a transaction.
    pub max_poll_attempts: u32,
    /// Execution energy cap for submitted transactions.
    pub max_energy: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BIND_ADDRESS`: listen address (default `0.0.0.0:8080`)
    /// - `WALLET_RPC_URL`: wallet daemon endpoint (default `http://localhost:9095`)
    /// - `POLL_INTERVAL_MS`: status poll delay in milliseconds (default 1000)
    /// - `MAX_POLL_ATTEMPTS`: poll budget per transaction (default 60)
    /// - `MAX_ENERGY`: execution energy cap (default 9999)
    pub fn from_env() -> Self {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let wallet_rpc_url =
            env::var("WALLET_RPC_URL").unwrap_or_else(|_| "http://localhost:9095".to_string());
        log::info!("Wallet RPC URL: {}", wallet_rpc_url);

        let poll_interval = env_u64("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL.as_millis() as u64);
        let max_poll_attempts = env_u64("MAX_POLL_ATTEMPTS", DEFAULT_MAX_POLL_ATTEMPTS as u64);
        let max_energy = env_u64("MAX_ENERGY", DEFAULT_MAX_ENERGY);
        log::info!(
            "Polling every {}ms, up to {} attempts, energy cap {}",
            poll_interval,
            max_poll_attempts,
            max_energy
        );

        Self {
            bind_address,
            wallet_rpc_url,
            poll_interval: Duration::from_millis(poll_interval),
            max_poll_attempts: max_poll_attempts as u32,
            max_energy,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            wallet_rpc_url: "http://localhost:9095".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            max_energy: DEFAULT_MAX_ENERGY,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring non-numeric {}='{}', using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_polling_matches_client_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_poll_attempts, 60);
        assert_eq!(config.max_energy, 9_999);
    }

    #[test]
    fn env_u64_falls_back_on_garbage() {
        std::env::set_var("CIS2_MINT_TEST_KNOB", "not-a-number");
        assert_eq!(env_u64("CIS2_MINT_TEST_KNOB", 42), 42);
        std::env::remove_var("CIS2_MINT_TEST_KNOB");
    }
}
