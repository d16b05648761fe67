// ── Solops Atoms: Pure Data Types ──────────────────────────────────────────
// All plain struct/enum definitions with no logic beyond small accessors.
// Atoms layer rule: no I/O, no side effects, no imports from engine/.

use serde::{Deserialize, Serialize};

// ── Network ────────────────────────────────────────────────────────────────

/// Solana cluster a wallet lives on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Devnet,
    Testnet,
}

impl Network {
    /// Parse the common cluster spellings, including the RPC-style
    /// "mainnet-beta" alias.
    pub fn parse(s: &str) -> Option<Network> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Some(Network::Mainnet),
            "devnet" => Some(Network::Devnet),
            "testnet" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Public RPC endpoint for the cluster.
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
        }
    }

    /// Free credits exist on test clusters only.
    pub fn allows_airdrop(self) -> bool {
        !matches!(self, Network::Mainnet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Wallet records ─────────────────────────────────────────────────────────

/// A funds-holding identity: network address plus optional custody material.
/// The address is assigned exactly once at creation and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub address: String,
    /// Balance in SOL (native units, not lamports).
    pub balance_sol: f64,
    pub network: Network,
    /// Base58-encoded 64-byte keypair when the wallet was generated locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub created_at: String,
}

/// What the wallet factory hands back: a fresh address and its secret.
#[derive(Debug, Clone)]
pub struct NewWallet {
    pub address: String,
    pub secret: String,
}

// ── Structured requests (extractor output) ─────────────────────────────────

/// A validated-shape batch creation request. Range checks happen in the
/// orchestrator before any wallet is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationRequest {
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_amount: Option<f64>,
}

/// Fund an existing wallet with SOL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRequest {
    pub address: String,
    pub amount: f64,
}

/// Swap one token for another at the configured aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u64>,
}

// ── Presentation boundary ──────────────────────────────────────────────────

/// Discriminator for what an action produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    WalletCreated,
    WalletFunded,
    SwapExecuted,
    Text,
}

/// Structured result an action hands to the presentation layer: a kind tag,
/// a human-readable message, and zero or more wallet records for the UI to
/// merge into its store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReply {
    pub kind: ReplyKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wallets: Vec<WalletRecord>,
}

impl ActionReply {
    /// Plain-text reply with no wallet payload.
    pub fn text(text: impl Into<String>) -> Self {
        ActionReply { kind: ReplyKind::Text, text: text.into(), wallets: Vec::new() }
    }

    pub fn wallet_created(text: impl Into<String>, wallets: Vec<WalletRecord>) -> Self {
        ActionReply { kind: ReplyKind::WalletCreated, text: text.into(), wallets }
    }

    pub fn wallet_funded(text: impl Into<String>, wallet: WalletRecord) -> Self {
        ActionReply { kind: ReplyKind::WalletFunded, text: text.into(), wallets: vec![wallet] }
    }

    pub fn swap_executed(text: impl Into<String>) -> Self {
        ActionReply { kind: ReplyKind::SwapExecuted, text: text.into(), wallets: Vec::new() }
    }
}
