// Solana layer — wallet custody, faucet funding, and swap execution over
// plain JSON-RPC and the Jupiter HTTP API.
//
// Module layout:
//   constants    — KNOWN_TOKENS, aggregator endpoint, slippage bounds
//   helpers      — amount conversions, token resolution, keypair parsing
//   rpc          — rpc_call, balance read, airdrop, send, confirmation poll
//   wallet       — ed25519 keypair factory (WalletFactory impl)
//   faucet       — airdrop-backed FundingService impl
//   transaction  — signing for aggregator-built transactions
//   jupiter      — swap quote + execution

pub(crate) mod constants;
pub(crate) mod helpers;
pub(crate) mod jupiter;
pub(crate) mod rpc;
pub(crate) mod transaction;

pub mod faucet;
pub mod wallet;

pub use faucet::RpcFaucet;
pub use wallet::KeypairFactory;
