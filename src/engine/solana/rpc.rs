// Solana layer — JSON-RPC client
// rpc_call, get_sol_balance, request_airdrop, send_transaction,
// await_confirmation.

use std::time::Duration;

use log::{debug, info};

use crate::atoms::error::{EngineError, EngineResult};

/// Make a Solana JSON-RPC call and unwrap the `result` field.
pub(crate) async fn rpc_call(
    rpc_url: &str,
    method: &str,
    params: serde_json::Value,
) -> EngineResult<serde_json::Value> {
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    });

    debug!("[solana] rpc {} → {}", method, rpc_url);

    let resp = client.post(rpc_url)
        .json(&body)
        .timeout(Duration::from_secs(30))
        .send()
        .await?;

    let json: serde_json::Value = resp.json().await?;

    if let Some(error) = json.get("error") {
        return Err(EngineError::rpc(method, error.to_string()));
    }

    json.get("result").cloned()
        .ok_or_else(|| EngineError::rpc(method, "missing 'result' field"))
}

/// Get SOL balance in lamports.
pub(crate) async fn get_sol_balance(rpc_url: &str, address: &str) -> EngineResult<u64> {
    let result = rpc_call(rpc_url, "getBalance", serde_json::json!([address])).await?;
    result.get("value")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| EngineError::rpc("getBalance", "failed to parse balance"))
}

/// Ask the cluster faucet to credit `address`. Returns the transaction
/// signature; the credit is not settled until the signature confirms.
pub(crate) async fn request_airdrop(
    rpc_url: &str,
    address: &str,
    lamports: u64,
) -> EngineResult<String> {
    let result = rpc_call(rpc_url, "requestAirdrop", serde_json::json!([address, lamports])).await?;
    result.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| EngineError::rpc("requestAirdrop", "expected signature string"))
}

/// Submit a signed, base64-encoded transaction. Returns the signature.
pub(crate) async fn send_transaction(rpc_url: &str, signed_b64: &str) -> EngineResult<String> {
    let result = rpc_call(rpc_url, "sendTransaction", serde_json::json!([
        signed_b64,
        { "encoding": "base64", "skipPreflight": false, "maxRetries": 3 }
    ])).await?;
    result.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| EngineError::rpc("sendTransaction", "expected signature string"))
}

/// Poll `getSignatureStatuses` until the signature reaches at least
/// "confirmed", the cluster reports a transaction error, or the poll
/// budget runs out.
pub(crate) async fn await_confirmation(
    rpc_url: &str,
    signature: &str,
    attempts: u32,
    interval_ms: u64,
) -> EngineResult<()> {
    for attempt in 1..=attempts {
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;

        let status = rpc_call(rpc_url, "getSignatureStatuses", serde_json::json!([[signature]])).await?;
        let entry = status.pointer("/value/0").cloned().unwrap_or(serde_json::Value::Null);

        if entry.is_null() {
            debug!("[solana] {} not yet seen (attempt {}/{})", signature, attempt, attempts);
            continue;
        }

        if let Some(err) = entry.get("err") {
            if !err.is_null() {
                return Err(EngineError::Confirmation(format!(
                    "transaction {signature} failed on-chain: {err}"
                )));
            }
        }

        let conf = entry.get("confirmationStatus").and_then(|v| v.as_str()).unwrap_or("pending");
        if conf == "confirmed" || conf == "finalized" {
            info!("[solana] {} {}", signature, conf);
            return Ok(());
        }
        debug!("[solana] {} still {} (attempt {}/{})", signature, conf, attempt, attempts);
    }

    Err(EngineError::Confirmation(format!(
        "transaction {signature} not confirmed after {attempts} attempts"
    )))
}
