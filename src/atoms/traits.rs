// ── Solops Atoms: Outbound Service Seams ───────────────────────────────────
// Trait boundaries for the two remote collaborators the engine drives:
// the wallet custody side (key generation) and the funding/faucet side.
// Production impls live in engine/solana/; tests substitute fakes.

use async_trait::async_trait;

use crate::atoms::error::EngineResult;
use crate::atoms::types::NewWallet;

/// Produces fresh wallets. No two invocations may return the same address.
#[async_trait]
pub trait WalletFactory: Send + Sync {
    /// Mint a new wallet with zero balance. `purpose` is recorded with the
    /// custody provider (or logged, for local key generation).
    async fn create_wallet(&self, purpose: &str) -> EngineResult<NewWallet>;
}

/// Credits addresses with native units and answers balance reads.
///
/// `request_transfer` only submits; settlement is not guaranteed until
/// `confirm_transfer` returns Ok. A balance read taken between the two may
/// still show the prior balance.
#[async_trait]
pub trait FundingService: Send + Sync {
    /// Ask the network to credit `address` with `lamports`.
    /// Returns the transfer id (transaction signature).
    async fn request_transfer(&self, address: &str, lamports: u64) -> EngineResult<String>;

    /// Block until the transfer is confirmed or the poll budget runs out.
    async fn confirm_transfer(&self, transfer_id: &str) -> EngineResult<()>;

    /// Current balance of `address` in lamports.
    async fn get_balance(&self, address: &str) -> EngineResult<u64>;
}
