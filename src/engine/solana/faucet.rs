// Solana layer — Funding requester
// Airdrop-backed FundingService. Refuses non-positive amounts and mainnet
// before any RPC traffic; blocks on confirmation after submitting.

use async_trait::async_trait;
use log::info;

use super::rpc::{await_confirmation, get_sol_balance, request_airdrop};
use crate::atoms::constants::{CONFIRM_POLL_ATTEMPTS, CONFIRM_POLL_INTERVAL_MS};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::FundingService;
use crate::atoms::types::Network;

/// Faucet client for a single cluster endpoint.
pub struct RpcFaucet {
    rpc_url: String,
    network: Network,
    poll_attempts: u32,
    poll_interval_ms: u64,
}

impl RpcFaucet {
    pub fn new(rpc_url: impl Into<String>, network: Network) -> Self {
        RpcFaucet {
            rpc_url: rpc_url.into(),
            network,
            poll_attempts: CONFIRM_POLL_ATTEMPTS,
            poll_interval_ms: CONFIRM_POLL_INTERVAL_MS,
        }
    }

    pub fn with_poll(mut self, attempts: u32, interval_ms: u64) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval_ms = interval_ms;
        self
    }
}

#[async_trait]
impl FundingService for RpcFaucet {
    async fn request_transfer(&self, address: &str, lamports: u64) -> EngineResult<String> {
        if lamports == 0 {
            return Err(EngineError::validation("funding amount must be positive"));
        }
        if !self.network.allows_airdrop() {
            return Err(EngineError::Unsupported(format!(
                "airdrops are not available on {}", self.network
            )));
        }

        let signature = request_airdrop(&self.rpc_url, address, lamports).await?;
        info!("[solana] Airdrop requested for {} ({} lamports): {}", address, lamports, signature);
        Ok(signature)
    }

    async fn confirm_transfer(&self, transfer_id: &str) -> EngineResult<()> {
        await_confirmation(&self.rpc_url, transfer_id, self.poll_attempts, self.poll_interval_ms).await
    }

    async fn get_balance(&self, address: &str) -> EngineResult<u64> {
        get_sol_balance(&self.rpc_url, address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both rejections happen before any HTTP request, so a bogus endpoint
    // proves no traffic was attempted.

    #[tokio::test]
    async fn mainnet_airdrop_is_unsupported() {
        let faucet = RpcFaucet::new("http://127.0.0.1:1", Network::Mainnet);
        let err = faucet.request_transfer("SomeAddress", 200_000_000).await.unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let faucet = RpcFaucet::new("http://127.0.0.1:1", Network::Devnet);
        let err = faucet.request_transfer("SomeAddress", 0).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
