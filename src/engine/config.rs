// Engine — Configuration
// Defaults target devnet. Environment overrides follow the original
// deployment surface (SOLANA_NETWORK, SOLANA_RPC_URL, JUPITER_API_KEY)
// plus explicit knobs for the batch pacing and confirmation poll.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::atoms::constants::{
    CONFIRM_POLL_ATTEMPTS, CONFIRM_POLL_INTERVAL_MS, DEFAULT_BATCH_DELAY_MS,
    MAX_SOL_PER_WALLET, MAX_WALLETS_PER_BATCH,
};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::Network;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub network: Network,
    pub rpc_url: String,
    /// Upper bound accepted for `CreationRequest::count`.
    pub max_wallets_per_batch: u32,
    /// Upper bound accepted for a per-wallet funding amount, in SOL.
    pub max_sol_per_wallet: f64,
    /// Pause between wallet creations inside a batch.
    pub batch_delay_ms: u64,
    pub confirm_poll_attempts: u32,
    pub confirm_poll_interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jupiter_api_key: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let network = Network::default();
        EngineConfig {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            max_wallets_per_batch: MAX_WALLETS_PER_BATCH,
            max_sol_per_wallet: MAX_SOL_PER_WALLET,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            confirm_poll_attempts: CONFIRM_POLL_ATTEMPTS,
            confirm_poll_interval_ms: CONFIRM_POLL_INTERVAL_MS,
            jupiter_api_key: None,
        }
    }
}

impl EngineConfig {
    /// Build a config from environment variables, falling back to defaults.
    /// An unrecognized `SOLANA_NETWORK` is reported and ignored.
    pub fn from_env() -> Self {
        let mut cfg = EngineConfig::default();

        if let Ok(raw) = std::env::var("SOLANA_NETWORK") {
            match Network::parse(&raw) {
                Some(network) => {
                    cfg.network = network;
                    cfg.rpc_url = network.default_rpc_url().to_string();
                }
                None => warn!("[engine] Ignoring unknown SOLANA_NETWORK '{raw}'"),
            }
        }
        if let Ok(url) = std::env::var("SOLANA_RPC_URL") {
            if !url.is_empty() {
                cfg.rpc_url = url;
            }
        }
        if let Ok(key) = std::env::var("JUPITER_API_KEY") {
            if !key.is_empty() {
                cfg.jupiter_api_key = Some(key);
            }
        }
        if let Some(v) = env_parse("SOLOPS_MAX_WALLETS_PER_BATCH") {
            cfg.max_wallets_per_batch = v;
        }
        if let Some(v) = env_parse("SOLOPS_MAX_SOL_PER_WALLET") {
            cfg.max_sol_per_wallet = v;
        }
        if let Some(v) = env_parse("SOLOPS_BATCH_DELAY_MS") {
            cfg.batch_delay_ms = v;
        }

        cfg
    }

    /// Reject configs that would make every request fail later.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(EngineError::Config(format!("invalid rpc_url: '{}'", self.rpc_url)));
        }
        if self.max_wallets_per_batch == 0 {
            return Err(EngineError::Config("max_wallets_per_batch must be positive".into()));
        }
        if !self.max_sol_per_wallet.is_finite() || self.max_sol_per_wallet <= 0.0 {
            return Err(EngineError::Config("max_sol_per_wallet must be positive".into()));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_target_devnet() {
        let cfg = EngineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.network, Network::Devnet);
        assert!(cfg.rpc_url.contains("devnet"));
        assert_eq!(cfg.max_wallets_per_batch, 100);
        assert_eq!(cfg.max_sol_per_wallet, 1.0);
        assert_eq!(cfg.batch_delay_ms, 1_000);
    }

    #[test]
    fn bad_values_fail_validation() {
        let mut cfg = EngineConfig::default();
        cfg.rpc_url = "not-a-url".into();
        assert!(matches!(cfg.validate(), Err(EngineError::Config(_))));

        let mut cfg = EngineConfig::default();
        cfg.max_wallets_per_batch = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.max_sol_per_wallet = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.network, cfg.network);
        assert_eq!(back.rpc_url, cfg.rpc_url);
    }
}
