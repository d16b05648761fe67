// ── Solops Atoms: Constants ────────────────────────────────────────────────
// Pure values shared across the engine. No I/O, no state.

/// Lamports per SOL (Solana's native-unit ratio).
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Hard cap on wallets per batch request.
pub const MAX_WALLETS_PER_BATCH: u32 = 100;

/// Hard cap on SOL funded into a single wallet.
pub const MAX_SOL_PER_WALLET: f64 = 1.0;

/// Pause between wallet creations inside a batch (faucet rate limits).
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;

/// How many times the confirmation poll re-checks a submitted transfer.
pub const CONFIRM_POLL_ATTEMPTS: u32 = 10;

/// Pause between confirmation polls.
pub const CONFIRM_POLL_INTERVAL_MS: u64 = 3_000;

/// Purpose string recorded with every wallet the factory mints.
pub const WALLET_PURPOSE: &str = "solana-operations";

/// File name of the engine database under the data directory.
pub const ENGINE_DB_FILE: &str = "solops.db";

/// Current layout version of the persisted wallet store. Bump on any
/// incompatible change to the `wallet_storage` table.
pub const STORE_SCHEMA_VERSION: i64 = 1;
