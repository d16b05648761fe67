//! Solops — a conversational Solana operations engine.
//!
//! Free-form chat text is matched to actions (create wallets, fund a wallet,
//! swap tokens, show wallets), the actions drive a Solana JSON-RPC endpoint,
//! and every created wallet lands in a persisted, address-deduplicated store.
//!
//! The host agent runtime, the rendering layer, and the swap aggregator are
//! external collaborators; this crate provides the engine and a structured
//! [`ActionReply`] at the presentation boundary.

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::types::{
    ActionReply, CreationRequest, FundRequest, Network, ReplyKind, SwapRequest, WalletRecord,
};
pub use engine::actions::{dispatch, ActionSpec};
pub use engine::config::EngineConfig;
pub use engine::state::EngineState;
pub use engine::store::WalletStore;
