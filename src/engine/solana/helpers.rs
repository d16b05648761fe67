// Solana layer — Helpers
// sol/lamports conversions, token resolution, keypair parsing.

use super::constants::KNOWN_TOKENS;
use crate::atoms::constants::LAMPORTS_PER_SOL;
use crate::atoms::error::{EngineError, EngineResult};

// ── Amount conversions ────────────────────────────────────────────────

/// Convert a SOL amount to lamports, rounding to the nearest lamport.
pub(crate) fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

/// Convert lamports to SOL for display and balance fields.
pub(crate) fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert a human-readable token amount to raw smallest units.
pub(crate) fn amount_to_raw(amount: f64, decimals: u8) -> EngineResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::validation(format!("Invalid amount: {amount}")));
    }
    let raw = amount * 10f64.powi(decimals as i32);
    if raw > u64::MAX as f64 {
        return Err(EngineError::validation("Amount too large"));
    }
    Ok(raw.round() as u64)
}

/// Format raw smallest units back to a human-readable amount, trimming
/// trailing zeros.
pub(crate) fn raw_to_amount(raw: u64, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let divisor = 10u64.pow(decimals as u32);
    let whole = raw / divisor;
    let frac = raw % divisor;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

// ── Addresses & keys ──────────────────────────────────────────────────

/// Check whether a string is plausibly a base58 Solana address
/// (decodes to exactly 32 bytes).
pub(crate) fn is_base58_address(s: &str) -> bool {
    let s = s.trim();
    (32..=44).contains(&s.len())
        && bs58::decode(s).into_vec().map(|b| b.len() == 32).unwrap_or(false)
}

/// Decode a base58-encoded 64-byte Solana keypair and extract the
/// 32-byte secret half.
pub(crate) fn parse_solana_keypair(keypair_b58: &str) -> EngineResult<[u8; 32]> {
    let keypair_bytes = bs58::decode(keypair_b58).into_vec()
        .map_err(|e| EngineError::Other(format!("Invalid keypair encoding: {e}")))?;
    if keypair_bytes.len() < 64 {
        return Err(EngineError::Other("Invalid Solana keypair (expected 64 bytes)".into()));
    }
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&keypair_bytes[..32]);
    Ok(secret)
}

/// Resolve a token symbol or mint address to (mint_address, decimals).
pub(crate) fn resolve_token(sym_or_addr: &str) -> EngineResult<(String, u8)> {
    let upper = sym_or_addr.trim().to_uppercase();
    for (sym, addr, dec) in KNOWN_TOKENS {
        if upper == *sym {
            return Ok((addr.to_string(), *dec));
        }
    }
    if is_base58_address(sym_or_addr) {
        // Unknown mint — caller must resolve decimals on-chain.
        return Ok((sym_or_addr.trim().to_string(), 0));
    }
    Err(EngineError::validation(format!(
        "Unknown token: '{}'. Use a mint address or known symbol: {}",
        sym_or_addr,
        KNOWN_TOKENS.iter().map(|(s, _, _)| *s).collect::<Vec<_>>().join(", ")
    )))
}
