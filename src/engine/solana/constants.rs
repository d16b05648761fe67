// Solana layer — Constants
// KNOWN_TOKENS, aggregator endpoint, slippage bounds.

/// Well-known SPL tokens (symbol, mint_address, decimals).
pub(crate) const KNOWN_TOKENS: &[(&str, &str, u8)] = &[
    ("SOL",  "So11111111111111111111111111111111111111112",  9),
    ("USDC", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", 6),
    ("USDT", "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", 6),
    ("BONK", "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", 5),
    ("JUP",  "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",  6),
    ("RAY",  "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R", 6),
    ("ORCA", "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE",  6),
];

/// Jupiter swap API base URL (v1 — requires an API key from jup.ag).
pub(crate) const JUPITER_API: &str = "https://api.jup.ag/swap/v1";

/// Default slippage tolerance (0.5% = 50 bps).
pub(crate) const DEFAULT_SLIPPAGE_BPS: u64 = 50;
/// Maximum allowed slippage.
pub(crate) const MAX_SLIPPAGE_BPS: u64 = 500;
