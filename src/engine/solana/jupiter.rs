// Solana layer — Jupiter aggregator client
// get_quote, execute_swap. The aggregator builds the transaction; we sign
// locally and broadcast it ourselves, so the secret never leaves the engine.

use std::time::Duration;

use log::info;

use super::constants::{DEFAULT_SLIPPAGE_BPS, JUPITER_API, MAX_SLIPPAGE_BPS};
use super::rpc::send_transaction;
use super::transaction::sign_transaction;
use crate::atoms::error::{EngineError, EngineResult};

/// A priced route for one swap, as returned by the quote endpoint.
#[derive(Debug, Clone)]
pub(crate) struct SwapQuote {
    pub out_amount_raw: u64,
    /// Worst acceptable output under the requested slippage.
    pub min_out_raw: u64,
    pub price_impact_pct: String,
    pub route: String,
    /// Full quote body — the swap endpoint wants it echoed back verbatim.
    pub body: serde_json::Value,
}

/// Clamp-and-default helper for slippage coming out of free-form text.
pub(crate) fn effective_slippage_bps(requested: Option<u64>) -> EngineResult<u64> {
    let bps = requested.unwrap_or(DEFAULT_SLIPPAGE_BPS);
    if bps == 0 || bps > MAX_SLIPPAGE_BPS {
        return Err(EngineError::validation(format!(
            "slippage {}bps out of range (1..={}bps)", bps, MAX_SLIPPAGE_BPS
        )));
    }
    Ok(bps)
}

/// Fetch a quote for swapping `amount_raw` of `input_mint` into `output_mint`.
pub(crate) async fn get_quote(
    api_key: &str,
    input_mint: &str,
    output_mint: &str,
    amount_raw: u64,
    slippage_bps: u64,
) -> EngineResult<SwapQuote> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}&restrictIntermediateTokens=true",
        JUPITER_API, input_mint, output_mint, amount_raw, slippage_bps
    );

    let resp = client.get(&url)
        .header("x-api-key", api_key)
        .timeout(Duration::from_secs(15))
        .send()
        .await?;

    let status = resp.status();
    let body: serde_json::Value = resp.json().await?;

    if !status.is_success() || body.get("outAmount").is_none() {
        let msg = body.get("error").and_then(|v| v.as_str())
            .or_else(|| body.get("message").and_then(|v| v.as_str()))
            .unwrap_or("no route found");
        return Err(EngineError::Other(format!("Jupiter quote failed: {msg}")));
    }

    let out_amount_raw: u64 = body.get("outAmount")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or("Missing outAmount in Jupiter response")?;
    let min_out_raw: u64 = body.get("otherAmountThreshold")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let price_impact_pct = body.get("priceImpactPct")
        .and_then(|v| v.as_str())
        .unwrap_or("0")
        .to_string();

    let route = body.get("routePlan")
        .and_then(|v| v.as_array())
        .map(|routes| {
            let labels: Vec<&str> = routes.iter()
                .filter_map(|r| r.pointer("/swapInfo/label").and_then(|v| v.as_str()))
                .collect();
            if labels.is_empty() { "Direct".to_string() } else { labels.join(" → ") }
        })
        .unwrap_or_else(|| "Direct".to_string());

    Ok(SwapQuote {
        out_amount_raw,
        min_out_raw,
        price_impact_pct,
        route,
        body,
    })
}

/// Request the built transaction for `quote`, sign it with `secret`, and
/// broadcast it. Returns the transaction signature; the caller decides how
/// long to wait for confirmation.
pub(crate) async fn execute_swap(
    rpc_url: &str,
    api_key: &str,
    wallet_address: &str,
    secret: &[u8; 32],
    quote: &SwapQuote,
) -> EngineResult<String> {
    let client = reqwest::Client::new();

    let swap_req = serde_json::json!({
        "quoteResponse": quote.body,
        "userPublicKey": wallet_address,
        "wrapAndUnwrapSol": true,
        "dynamicComputeUnitLimit": true,
    });

    let resp = client.post(format!("{JUPITER_API}/swap"))
        .header("x-api-key", api_key)
        .json(&swap_req)
        .timeout(Duration::from_secs(20))
        .send()
        .await?;

    let body: serde_json::Value = resp.json().await?;
    let tx_b64 = body.get("swapTransaction")
        .and_then(|v| v.as_str())
        .ok_or_else(|| EngineError::Other(format!(
            "Jupiter swap failed: {}",
            body.get("error").and_then(|v| v.as_str()).unwrap_or("missing swapTransaction")
        )))?;

    let tx_bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, tx_b64)
        .map_err(|e| EngineError::Other(format!("Invalid swap transaction encoding: {e}")))?;

    let signed = sign_transaction(&tx_bytes, secret)?;
    let signed_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &signed);

    let signature = send_transaction(rpc_url, &signed_b64).await?;
    info!("[solana] Swap submitted via {}: {}", quote.route, signature);
    Ok(signature)
}
