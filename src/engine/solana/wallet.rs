// Solana layer — Wallet factory
// Local ed25519 key generation. Addresses are base58 of the verifying key;
// secrets use the Solana convention of a base58-encoded 64-byte keypair
// (secret half followed by public half).

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use log::info;
use rand_core::OsRng;

use crate::atoms::error::EngineResult;
use crate::atoms::traits::WalletFactory;
use crate::atoms::types::NewWallet;

/// Generate a fresh ed25519 keypair.
pub(crate) fn generate_keypair() -> NewWallet {
    let signing_key = SigningKey::generate(&mut OsRng);
    let public_key = signing_key.verifying_key();

    let address = bs58::encode(public_key.as_bytes()).into_string();

    let mut keypair_bytes = [0u8; 64];
    keypair_bytes[..32].copy_from_slice(&signing_key.to_bytes());
    keypair_bytes[32..].copy_from_slice(public_key.as_bytes());
    let secret = bs58::encode(&keypair_bytes).into_string();

    NewWallet { address, secret }
}

/// Derive the base58 public address from ed25519 secret key bytes.
#[allow(dead_code)]
pub(crate) fn pubkey_from_secret(secret_bytes: &[u8; 32]) -> EngineResult<String> {
    let signing_key = SigningKey::from_bytes(secret_bytes);
    let public_key = signing_key.verifying_key();
    Ok(bs58::encode(public_key.as_bytes()).into_string())
}

/// Self-custody wallet factory: keys are minted locally, never fetched from
/// a remote custody service.
#[derive(Debug, Default)]
pub struct KeypairFactory;

#[async_trait]
impl WalletFactory for KeypairFactory {
    async fn create_wallet(&self, purpose: &str) -> EngineResult<NewWallet> {
        let wallet = generate_keypair();
        info!("[solana] Created wallet {} (purpose: {})", wallet.address, purpose);
        Ok(wallet)
    }
}
