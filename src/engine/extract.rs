// Engine — Parameter extraction
// One canonical grammar for turning free-form chat text into structured
// requests. Keyword matching is case-insensitive; amounts use the
// "<number> sol" pattern. Precedence rule: an explicit numeric count
// ("create 5 wallets") always wins over the bare single-wallet phrasing
// ("create a wallet" → count 1).

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::atoms::types::{CreationRequest, FundRequest, SwapRequest};
use crate::engine::solana::helpers::is_base58_address;

fn re(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hard-coded pattern compiles"))
}

fn count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)(?:create|generate|make|spawn)\s+(?:me\s+)?(\d+)\s+(?:new\s+|fresh\s+)?(?:solana\s+)?wallets?")
}

fn single_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)(?:create|generate|make|spawn)\s+(?:me\s+)?(?:a\s+)?(?:new\s+|fresh\s+)?(?:solana\s+)?wallet\b")
}

fn sol_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)(\d*\.?\d+)\s*sol\b")
}

fn fund_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)\b(?:fund|top\s*up)\b")
}

fn swap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)\bswap\s+(\d*\.?\d+)\s+(\w+)\s+(?:for|to|into)\s+(\w+)")
}

fn slippage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?i)(\d*\.?\d+)\s*%\s*slippage")
}

/// Parse a batch-creation request out of raw text. Returns `None` when no
/// count-indicating phrase is found; the optional funding amount rides along
/// when a "<number> sol" pattern is present.
pub fn extract_create_wallets(text: &str) -> Option<CreationRequest> {
    let count = match count_re().captures(text) {
        Some(caps) => caps.get(1)?.as_str().parse::<u32>().ok()?,
        None if single_re().is_match(text) => 1,
        None => {
            debug!("[engine] No wallet-creation intent in: {text:?}");
            return None;
        }
    };

    let fund_amount = sol_amount_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    debug!("[engine] Extracted creation request: count={count} fund={fund_amount:?}");
    Some(CreationRequest { count, fund_amount })
}

/// Parse a funding request: needs a fund keyword, a "<number> sol" amount,
/// and a base58 address token somewhere in the text.
pub fn extract_fund(text: &str) -> Option<FundRequest> {
    if !fund_re().is_match(text) {
        return None;
    }

    let amount = sol_amount_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())?;

    let address = text
        .split_whitespace()
        .map(|tok| tok.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|tok| is_base58_address(tok))?
        .to_string();

    Some(FundRequest { address, amount })
}

/// Parse "swap <amount> <TOKEN> for <TOKEN>", with an optional
/// "<n>% slippage" suffix (converted to basis points).
pub fn extract_swap(text: &str) -> Option<SwapRequest> {
    let caps = swap_re().captures(text)?;
    let amount = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let token_in = caps.get(2)?.as_str().to_string();
    let token_out = caps.get(3)?.as_str().to_string();

    let slippage_bps = slippage_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|pct| (pct * 100.0).round() as u64);

    Some(SwapRequest { token_in, token_out, amount, slippage_bps })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_create_without_amount() {
        let req = extract_create_wallets("create 5 wallets").unwrap();
        assert_eq!(req, CreationRequest { count: 5, fund_amount: None });
    }

    #[test]
    fn counted_create_with_amount() {
        let req = extract_create_wallets("create 3 wallets with 0.2 sol").unwrap();
        assert_eq!(req, CreationRequest { count: 3, fund_amount: Some(0.2) });
    }

    #[test]
    fn bare_phrase_defaults_to_one() {
        let req = extract_create_wallets("create a wallet").unwrap();
        assert_eq!(req.count, 1);
        assert_eq!(req.fund_amount, None);

        let req = extract_create_wallets("please create wallet").unwrap();
        assert_eq!(req.count, 1);
    }

    #[test]
    fn no_intent_is_no_match() {
        assert!(extract_create_wallets("hello").is_none());
        assert!(extract_create_wallets("what's my balance?").is_none());
    }

    #[test]
    fn numeric_count_wins_over_single_phrase() {
        // Both patterns could fire on creative phrasing; the count must win.
        let req = extract_create_wallets("generate me 10 fresh wallets and fund each with 0.1 sol").unwrap();
        assert_eq!(req.count, 10);
        assert_eq!(req.fund_amount, Some(0.1));
    }

    #[test]
    fn alternate_verbs_are_accepted() {
        assert_eq!(extract_create_wallets("make 20 wallets").unwrap().count, 20);
        assert_eq!(extract_create_wallets("spawn 2 solana wallets").unwrap().count, 2);
    }

    #[test]
    fn fund_extraction_needs_address_and_amount() {
        let text = "fund wallet So11111111111111111111111111111111111111112 with 0.5 sol";
        let req = extract_fund(text).unwrap();
        assert_eq!(req.address, "So11111111111111111111111111111111111111112");
        assert_eq!(req.amount, 0.5);

        assert!(extract_fund("fund my wallet please").is_none());
        assert!(extract_fund("send 0.5 sol somewhere").is_none());
    }

    #[test]
    fn swap_extraction_with_slippage() {
        let req = extract_swap("swap 1.5 SOL for USDC with 0.5% slippage").unwrap();
        assert_eq!(req.token_in, "SOL");
        assert_eq!(req.token_out, "USDC");
        assert_eq!(req.amount, 1.5);
        assert_eq!(req.slippage_bps, Some(50));

        let req = extract_swap("swap 100 usdc to sol").unwrap();
        assert_eq!(req.slippage_bps, None);
        assert!(extract_swap("trade everything").is_none());
    }
}
