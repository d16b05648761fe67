// Engine — Conversational actions
// The chat-facing surface: each action carries registration metadata for a
// host runtime (name, similes, example phrases), a match predicate over raw
// text, and a handler that returns a structured ActionReply. Dispatch runs
// the first action whose extractor recognizes the text; handlers never
// retry — failures propagate to the caller, which renders a generic
// user-facing failure message.

use std::sync::OnceLock;

use log::{debug, info};
use regex::Regex;

use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ActionReply, WalletRecord};
use crate::engine::extract;
use crate::engine::state::EngineState;

// ── Registration metadata ─────────────────────────────────────────────

/// Descriptor a host agent runtime consumes when registering the engine's
/// actions. The engine itself only needs `dispatch`.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: &'static str,
    pub similes: &'static [&'static str],
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

impl ActionSpec {
    pub fn create_wallets() -> Self {
        ActionSpec {
            name: "create_wallets",
            similes: &[
                "CREATE_WALLETS", "GENERATE_WALLETS", "MAKE_WALLETS",
                "SPAWN_WALLETS", "NEW_WALLETS", "SETUP_WALLETS",
            ],
            description: "Create one or more Solana wallets and optionally fund each with SOL",
            examples: &[
                "Create 5 new wallets",
                "Generate 10 wallets and fund each with 0.1 SOL",
                "Make me 3 fresh wallets",
                "Create a wallet",
            ],
        }
    }

    pub fn fund_wallet() -> Self {
        ActionSpec {
            name: "fund_wallet",
            similes: &["FUND_WALLET", "SEND_SOL", "ADD_FUNDS", "TOP_UP"],
            description: "Fund an existing Solana wallet with SOL from the cluster faucet",
            examples: &[
                "Fund wallet <address> with 0.1 SOL",
                "Top up <address> with 0.5 sol",
            ],
        }
    }

    pub fn swap_tokens() -> Self {
        ActionSpec {
            name: "swap_tokens",
            similes: &["SWAP_TOKENS", "EXCHANGE_TOKENS", "TRADE_TOKENS", "CONVERT_TOKENS"],
            description: "Swap tokens through the Jupiter aggregator",
            examples: &[
                "Swap 1 SOL for USDC",
                "Swap 0.5 SOL to USDT with 0.5% slippage",
            ],
        }
    }

    pub fn show_wallets() -> Self {
        ActionSpec {
            name: "show_wallets",
            similes: &["SHOW_WALLETS", "LIST_WALLETS", "MY_WALLETS"],
            description: "List the wallets created so far",
            examples: &["Show my wallets", "List wallets"],
        }
    }

    /// Everything the engine registers, in dispatch order.
    pub fn all() -> Vec<ActionSpec> {
        vec![
            Self::create_wallets(),
            Self::fund_wallet(),
            Self::swap_tokens(),
            Self::show_wallets(),
        ]
    }
}

fn show_wallets_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:show|list|display)\b.*\bwallets?\b").expect("hard-coded pattern compiles")
    })
}

// ── Dispatch ──────────────────────────────────────────────────────────

/// Route raw chat text to the first matching action. No recognizable
/// intent is a validation error — nothing was attempted.
pub async fn dispatch(state: &EngineState, text: &str) -> EngineResult<ActionReply> {
    if let Some(req) = extract::extract_create_wallets(text) {
        return handle_create_wallets(state, req).await;
    }
    if let Some(req) = extract::extract_fund(text) {
        return handle_fund_wallet(state, req).await;
    }
    if let Some(req) = extract::extract_swap(text) {
        return handle_swap_tokens(state, req).await;
    }
    if show_wallets_re().is_match(text) {
        return handle_show_wallets(state);
    }

    debug!("[engine] No action matched: {text:?}");
    Err(EngineError::validation("no recognizable intent"))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn handle_create_wallets(
    state: &EngineState,
    req: crate::atoms::types::CreationRequest,
) -> EngineResult<ActionReply> {
    info!("[engine] create_wallets: {req:?}");
    let wallets = state.create_batch_wallets(&req).await?;

    let mut text = match req.fund_amount {
        Some(amount) => format!(
            "Created {} wallet(s) on {}, each funded with {} SOL:",
            wallets.len(), state.config.network, amount
        ),
        None => format!(
            "Created {} unfunded wallet(s) on {}:",
            wallets.len(), state.config.network
        ),
    };
    for wallet in &wallets {
        text.push_str(&format!("\n  {} ({} SOL)", wallet.address, wallet.balance_sol));
    }

    Ok(ActionReply::wallet_created(text, wallets))
}

async fn handle_fund_wallet(
    state: &EngineState,
    req: crate::atoms::types::FundRequest,
) -> EngineResult<ActionReply> {
    info!("[engine] fund_wallet: {} ← {} SOL", req.address, req.amount);
    let balance = state.fund_wallet(&req.address, req.amount).await?;

    let record = match state.store.get(&req.address)? {
        Some(stored) => stored,
        // Funding an address the store never saw still succeeds on-chain.
        None => WalletRecord {
            address: req.address.clone(),
            balance_sol: balance,
            network: state.config.network,
            secret: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        },
    };

    let text = format!(
        "Funded wallet {} with {} SOL. Balance is now {} SOL.",
        req.address, req.amount, balance
    );
    Ok(ActionReply::wallet_funded(text, record))
}

async fn handle_swap_tokens(
    state: &EngineState,
    req: crate::atoms::types::SwapRequest,
) -> EngineResult<ActionReply> {
    info!("[engine] swap_tokens: {} {} → {}", req.amount, req.token_in, req.token_out);
    let outcome = state.execute_swap(&req).await?;

    let text = format!(
        "Swapped {} {} for {} {} via {} (min received {}, price impact {}%). Transaction: {}",
        req.amount,
        req.token_in.to_uppercase(),
        outcome.out_amount,
        req.token_out.to_uppercase(),
        outcome.route,
        outcome.min_out_amount,
        outcome.price_impact_pct,
        outcome.signature
    );
    Ok(ActionReply::swap_executed(text))
}

fn handle_show_wallets(state: &EngineState) -> EngineResult<ActionReply> {
    let wallets = state.store.all()?;
    if wallets.is_empty() {
        return Ok(ActionReply::text("No wallets yet. Try \"create 5 wallets\"."));
    }

    let mut text = format!("{} wallet(s):", wallets.len());
    for wallet in &wallets {
        text.push_str(&format!(
            "\n  {} — {} SOL ({})",
            wallet.address, wallet.balance_sol, wallet.network
        ));
    }
    Ok(ActionReply::text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::traits::{FundingService, WalletFactory};
    use crate::atoms::types::{NewWallet, Network, ReplyKind};
    use crate::engine::config::EngineConfig;
    use crate::engine::store::WalletStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    struct SeqFactory(AtomicU32);

    #[async_trait]
    impl WalletFactory for SeqFactory {
        async fn create_wallet(&self, _purpose: &str) -> EngineResult<NewWallet> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(NewWallet { address: format!("addr-{n}"), secret: format!("sec-{n}") })
        }
    }

    struct LedgerFunding(Mutex<HashMap<String, u64>>);

    #[async_trait]
    impl FundingService for LedgerFunding {
        async fn request_transfer(&self, address: &str, lamports: u64) -> EngineResult<String> {
            *self.0.lock().unwrap().entry(address.to_string()).or_insert(0) += lamports;
            Ok("sig".into())
        }
        async fn confirm_transfer(&self, _transfer_id: &str) -> EngineResult<()> {
            Ok(())
        }
        async fn get_balance(&self, address: &str) -> EngineResult<u64> {
            Ok(*self.0.lock().unwrap().get(address).unwrap_or(&0))
        }
    }

    fn test_state() -> EngineState {
        let config = EngineConfig { batch_delay_ms: 0, ..EngineConfig::default() };
        EngineState::with_parts(
            config,
            Arc::new(WalletStore::open_in_memory().unwrap()),
            Box::new(SeqFactory(AtomicU32::new(0))),
            Box::new(LedgerFunding(Mutex::new(HashMap::new()))),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_text_yields_wallet_created_reply() {
        let state = test_state();
        let reply = dispatch(&state, "create 2 wallets with 0.1 sol").await.unwrap();

        assert_eq!(reply.kind, ReplyKind::WalletCreated);
        assert_eq!(reply.wallets.len(), 2);
        assert!(reply.text.contains("2 wallet(s)"));
        assert_eq!(state.store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_text_is_a_validation_error() {
        let state = test_state();
        let err = dispatch(&state, "hello").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(state.store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn fund_updates_the_stored_balance() {
        let state = test_state();
        // A base58-shaped address so the extractor picks it up.
        let address = "So11111111111111111111111111111111111111112";
        state.store.add(&WalletRecord {
            address: address.into(),
            balance_sol: 0.0,
            network: Network::Devnet,
            secret: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }).unwrap();

        let text = format!("fund wallet {address} with 0.5 sol");
        let reply = dispatch(&state, &text).await.unwrap();

        assert_eq!(reply.kind, ReplyKind::WalletFunded);
        assert_eq!(state.store.get(address).unwrap().unwrap().balance_sol, 0.5);
    }

    #[tokio::test]
    async fn over_cap_funding_is_rejected() {
        let state = test_state();
        let text = "fund wallet So11111111111111111111111111111111111111112 with 2 sol";
        let err = dispatch(&state, text).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn swap_without_api_key_fails_with_config_error() {
        let state = test_state();
        let err = dispatch(&state, "swap 1 SOL for USDC").await.unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[tokio::test]
    async fn show_wallets_lists_the_store() {
        let state = test_state();
        dispatch(&state, "create 3 wallets").await.unwrap();

        let reply = dispatch(&state, "show my wallets").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Text);
        assert!(reply.text.contains("3 wallet(s)"));
        assert!(reply.text.contains("addr-0"));
    }

    #[test]
    fn registry_covers_every_action() {
        let names: Vec<_> = ActionSpec::all().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["create_wallets", "fund_wallet", "swap_tokens", "show_wallets"]);
    }
}
