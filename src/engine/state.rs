// Engine — Shared state and plugin-level operations
// Canonical home for EngineState: config + wallet store + the outbound
// service handles. The action handlers call these methods; so does the CLI.

use std::sync::Arc;

use log::info;

use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::{FundingService, WalletFactory};
use crate::atoms::types::{CreationRequest, SwapRequest, WalletRecord};
use crate::engine::batch;
use crate::engine::config::EngineConfig;
use crate::engine::solana::helpers::{
    amount_to_raw, lamports_to_sol, parse_solana_keypair, raw_to_amount, resolve_token,
};
use crate::engine::solana::{jupiter, rpc, KeypairFactory, RpcFaucet};
use crate::engine::store::WalletStore;

/// What a completed swap looks like to the presentation layer.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub signature: String,
    pub out_amount: String,
    /// Worst acceptable output under the requested slippage.
    pub min_out_amount: String,
    pub route: String,
    pub price_impact_pct: String,
}

pub struct EngineState {
    pub config: EngineConfig,
    pub store: Arc<WalletStore>,
    factory: Box<dyn WalletFactory>,
    funding: Box<dyn FundingService>,
}

impl EngineState {
    /// Production wiring: local keypair factory + airdrop faucet against the
    /// configured cluster, store at the default path.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let store = Arc::new(WalletStore::open_default()?);
        let faucet = RpcFaucet::new(&config.rpc_url, config.network)
            .with_poll(config.confirm_poll_attempts, config.confirm_poll_interval_ms);
        Self::with_parts(config, store, Box::new(KeypairFactory), Box::new(faucet))
    }

    /// Explicit wiring; tests substitute fakes for the outbound services.
    pub fn with_parts(
        config: EngineConfig,
        store: Arc<WalletStore>,
        factory: Box<dyn WalletFactory>,
        funding: Box<dyn FundingService>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(EngineState { config, store, factory, funding })
    }

    // ── Wallet operations ──────────────────────────────────────────────

    /// Create `req.count` wallets sequentially, funding each when an amount
    /// is present. See `engine::batch` for pacing and failure semantics.
    pub async fn create_batch_wallets(&self, req: &CreationRequest) -> EngineResult<Vec<WalletRecord>> {
        batch::run_batch(req, &self.config, &self.store, self.factory.as_ref(), self.funding.as_ref()).await
    }

    /// Single-wallet convenience used by the bare "create a wallet" phrase.
    pub async fn create_and_fund_wallet(&self, fund_amount: Option<f64>) -> EngineResult<WalletRecord> {
        let req = CreationRequest { count: 1, fund_amount };
        let mut wallets = self.create_batch_wallets(&req).await?;
        wallets.pop().ok_or_else(|| EngineError::Other("batch returned no wallet".into()))
    }

    /// Fund an existing address and return its settled balance in SOL.
    /// The stored record's balance is refreshed when the address is known.
    pub async fn fund_wallet(&self, address: &str, amount: f64) -> EngineResult<f64> {
        if !amount.is_finite() || amount <= 0.0 || amount > self.config.max_sol_per_wallet {
            return Err(EngineError::validation(format!(
                "fund amount must be in (0, {}] SOL, got {}",
                self.config.max_sol_per_wallet, amount
            )));
        }

        let balance = batch::fund_and_read_balance(self.funding.as_ref(), address, amount).await?;
        self.store.update_balance(address, balance)?;
        info!("[engine] Funded {} with {} SOL (balance now {})", address, amount, balance);
        Ok(balance)
    }

    /// Current balance of any address, in SOL.
    pub async fn get_balance(&self, address: &str) -> EngineResult<f64> {
        let lamports = self.funding.get_balance(address).await?;
        Ok(lamports_to_sol(lamports))
    }

    // ── Swap ───────────────────────────────────────────────────────────

    /// Quote and execute a token swap, signing with the most recently
    /// created wallet that still has local secret material.
    pub async fn execute_swap(&self, req: &SwapRequest) -> EngineResult<SwapOutcome> {
        let api_key = self.config.jupiter_api_key.as_deref()
            .ok_or_else(|| EngineError::Config("JUPITER_API_KEY is not configured".into()))?;

        let wallet = self.store.latest_with_secret()?
            .ok_or_else(|| EngineError::validation("no local wallet available — create one first"))?;
        let secret_b58 = wallet.secret.as_deref()
            .ok_or_else(|| EngineError::Other("wallet record lost its secret".into()))?;
        let secret = parse_solana_keypair(secret_b58)?;

        let (input_mint, in_decimals) = resolve_token(&req.token_in)?;
        let (output_mint, out_decimals) = resolve_token(&req.token_out)?;
        let amount_raw = amount_to_raw(req.amount, in_decimals)?;
        let slippage_bps = jupiter::effective_slippage_bps(req.slippage_bps)?;

        let quote = jupiter::get_quote(api_key, &input_mint, &output_mint, amount_raw, slippage_bps).await?;
        let signature = jupiter::execute_swap(
            &self.config.rpc_url, api_key, &wallet.address, &secret, &quote,
        ).await?;

        rpc::await_confirmation(
            &self.config.rpc_url,
            &signature,
            self.config.confirm_poll_attempts,
            self.config.confirm_poll_interval_ms,
        ).await?;

        Ok(SwapOutcome {
            signature,
            out_amount: raw_to_amount(quote.out_amount_raw, out_decimals),
            min_out_amount: raw_to_amount(quote.min_out_raw, out_decimals),
            route: quote.route,
            price_impact_pct: quote.price_impact_pct,
        })
    }
}
