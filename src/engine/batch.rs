// Engine — Batch orchestrator
// Sequences wallet creation and funding for one validated request. Wallets
// are created strictly one at a time with a configured pause between them
// (the faucet rate-limits aggressively). No cancellation and no automatic
// retry: the first failing wallet aborts the batch, and wallets completed
// before the failure remain in the store, funded.

use std::time::Duration;

use log::info;

use crate::atoms::constants::WALLET_PURPOSE;
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::{FundingService, WalletFactory};
use crate::atoms::types::{CreationRequest, WalletRecord};
use crate::engine::config::EngineConfig;
use crate::engine::solana::helpers::{lamports_to_sol, sol_to_lamports};
use crate::engine::store::WalletStore;

/// Range-check a creation request against the configured caps. Runs before
/// any wallet is created; a failure here has no side effects.
pub fn validate_request(req: &CreationRequest, cfg: &EngineConfig) -> EngineResult<()> {
    if req.count == 0 || req.count > cfg.max_wallets_per_batch {
        return Err(EngineError::validation(format!(
            "wallet count must be in 1..={}, got {}",
            cfg.max_wallets_per_batch, req.count
        )));
    }
    if let Some(amount) = req.fund_amount {
        if !amount.is_finite() || amount <= 0.0 || amount > cfg.max_sol_per_wallet {
            return Err(EngineError::validation(format!(
                "fund amount must be in (0, {}] SOL, got {}",
                cfg.max_sol_per_wallet, amount
            )));
        }
    }
    Ok(())
}

/// Credit `address`, block on confirmation, then read back the settled
/// balance in SOL.
pub(crate) async fn fund_and_read_balance(
    funding: &dyn FundingService,
    address: &str,
    amount_sol: f64,
) -> EngineResult<f64> {
    let transfer_id = funding.request_transfer(address, sol_to_lamports(amount_sol)).await?;
    funding.confirm_transfer(&transfer_id).await?;
    let lamports = funding.get_balance(address).await?;
    Ok(lamports_to_sol(lamports))
}

/// Create `req.count` wallets, funding each when an amount is present.
/// Returns one record per requested wallet, in creation order.
pub async fn run_batch(
    req: &CreationRequest,
    cfg: &EngineConfig,
    store: &WalletStore,
    factory: &dyn WalletFactory,
    funding: &dyn FundingService,
) -> EngineResult<Vec<WalletRecord>> {
    validate_request(req, cfg)?;

    let batch_id = uuid::Uuid::new_v4();
    info!(
        "[engine] Batch {}: creating {} wallet(s) on {} (fund: {:?} SOL)",
        batch_id, req.count, cfg.network, req.fund_amount
    );

    let mut wallets = Vec::with_capacity(req.count as usize);
    for i in 0..req.count {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(cfg.batch_delay_ms)).await;
        }

        let minted = factory.create_wallet(WALLET_PURPOSE).await?;
        let mut record = WalletRecord {
            address: minted.address,
            balance_sol: 0.0,
            network: cfg.network,
            secret: Some(minted.secret),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        store.add(&record)?;

        if let Some(amount) = req.fund_amount {
            let balance = fund_and_read_balance(funding, &record.address, amount).await?;
            record.balance_sol = balance;
            store.update_balance(&record.address, balance)?;
        }

        wallets.push(record);
    }

    info!("[engine] Batch {} complete: {} wallet(s)", batch_id, wallets.len());
    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::NewWallet;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FakeFactory {
        minted: AtomicU32,
    }

    impl FakeFactory {
        fn new() -> Self {
            FakeFactory { minted: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl WalletFactory for FakeFactory {
        async fn create_wallet(&self, _purpose: &str) -> EngineResult<NewWallet> {
            let n = self.minted.fetch_add(1, Ordering::SeqCst);
            Ok(NewWallet { address: format!("wallet-{n}"), secret: format!("secret-{n}") })
        }
    }

    /// Records credits in a ledger; optionally fails the Nth transfer.
    struct FakeFunding {
        ledger: Mutex<HashMap<String, u64>>,
        transfers: AtomicU32,
        fail_on_transfer: Option<u32>,
    }

    impl FakeFunding {
        fn new() -> Self {
            FakeFunding {
                ledger: Mutex::new(HashMap::new()),
                transfers: AtomicU32::new(0),
                fail_on_transfer: None,
            }
        }

        fn failing_on(n: u32) -> Self {
            FakeFunding { fail_on_transfer: Some(n), ..Self::new() }
        }
    }

    #[async_trait]
    impl FundingService for FakeFunding {
        async fn request_transfer(&self, address: &str, lamports: u64) -> EngineResult<String> {
            let n = self.transfers.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_transfer == Some(n) {
                return Err(EngineError::rpc("requestAirdrop", "faucet dry"));
            }
            *self.ledger.lock().unwrap().entry(address.to_string()).or_insert(0) += lamports;
            Ok(format!("sig-{n}"))
        }

        async fn confirm_transfer(&self, _transfer_id: &str) -> EngineResult<()> {
            Ok(())
        }

        async fn get_balance(&self, address: &str) -> EngineResult<u64> {
            Ok(*self.ledger.lock().unwrap().get(address).unwrap_or(&0))
        }
    }

    fn fast_config() -> EngineConfig {
        EngineConfig { batch_delay_ms: 0, ..EngineConfig::default() }
    }

    #[tokio::test]
    async fn returns_exactly_count_distinct_wallets() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();
        let req = CreationRequest { count: 5, fund_amount: None };

        let wallets = run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::new())
            .await
            .unwrap();

        assert_eq!(wallets.len(), 5);
        let mut addresses: Vec<_> = wallets.iter().map(|w| w.address.clone()).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 5);
        assert!(wallets.iter().all(|w| w.balance_sol == 0.0));
        assert_eq!(store.count().unwrap(), 5);
    }

    #[tokio::test]
    async fn funded_batch_settles_each_balance() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();
        let req = CreationRequest { count: 3, fund_amount: Some(0.2) };

        let wallets = run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::new())
            .await
            .unwrap();

        for wallet in &wallets {
            assert_eq!(wallet.balance_sol, 0.2);
            let stored = store.get(&wallet.address).unwrap().unwrap();
            assert_eq!(stored.balance_sol, 0.2);
        }
    }

    #[tokio::test]
    async fn zero_count_rejected_before_any_side_effect() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();
        let factory = FakeFactory::new();
        let req = CreationRequest { count: 0, fund_amount: None };

        let err = run_batch(&req, &cfg, &store, &factory, &FakeFunding::new())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(factory.minted.load(Ordering::SeqCst), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn over_cap_count_and_amount_rejected() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();

        let req = CreationRequest { count: 101, fund_amount: None };
        assert!(matches!(
            run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::new()).await,
            Err(EngineError::Validation(_))
        ));

        for bad_amount in [0.0, -0.5, 1.5] {
            let req = CreationRequest { count: 1, fund_amount: Some(bad_amount) };
            assert!(matches!(
                run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::new()).await,
                Err(EngineError::Validation(_))
            ));
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn boundary_values_are_accepted() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();
        let req = CreationRequest { count: 100, fund_amount: Some(1.0) };
        let wallets = run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::new())
            .await
            .unwrap();
        assert_eq!(wallets.len(), 100);
    }

    #[tokio::test]
    async fn mainnet_funding_refused_and_balance_stays_zero() {
        use crate::atoms::types::Network;
        use crate::engine::solana::RpcFaucet;

        let cfg = EngineConfig {
            network: Network::Mainnet,
            batch_delay_ms: 0,
            ..EngineConfig::default()
        };
        let store = WalletStore::open_in_memory().unwrap();
        let req = CreationRequest { count: 1, fund_amount: Some(0.2) };

        // The faucet refuses mainnet before touching the endpoint, so the
        // bogus URL proves no request went out.
        let faucet = RpcFaucet::new("http://127.0.0.1:1", Network::Mainnet);
        let err = run_batch(&req, &cfg, &store, &FakeFactory::new(), &faucet)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));

        let records = store.all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].balance_sol, 0.0);
    }

    #[tokio::test]
    async fn mid_batch_failure_keeps_completed_wallets() {
        let cfg = fast_config();
        let store = WalletStore::open_in_memory().unwrap();
        let req = CreationRequest { count: 5, fund_amount: Some(0.1) };

        // Third transfer fails: two wallets fully funded, the third created
        // but unfunded, the last two never minted.
        let err = run_batch(&req, &cfg, &store, &FakeFactory::new(), &FakeFunding::failing_on(3))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Rpc { .. }));

        let records = store.all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].balance_sol, 0.1);
        assert_eq!(records[1].balance_sol, 0.1);
        assert_eq!(records[2].balance_sol, 0.0);
    }
}
