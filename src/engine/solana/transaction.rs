// Solana layer — Transaction signing
// Signs pre-built transactions returned by the swap aggregator.
//
// Wire layouts:
//   legacy:    [num_signatures (compact-u16)] [signature slots (N×64)] [message]
//   versioned: [0x80 | version] [num_signatures] [signature slots] [message]
// The signed payload is the message; for versioned transactions the version
// prefix byte is part of the signed payload.

use ed25519_dalek::{Signer, SigningKey};

use crate::atoms::error::{EngineError, EngineResult};

/// Decode Solana's compact-u16 length prefix. Returns (value, bytes read).
pub(crate) fn read_compact_u16(data: &[u8]) -> EngineResult<(u16, usize)> {
    let mut value: u16 = 0;
    for (i, &byte) in data.iter().take(3).enumerate() {
        value |= ((byte & 0x7F) as u16) << (7 * i);
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
    }
    Err(EngineError::Other("Truncated compact-u16".into()))
}

/// Sign a serialized transaction in place of its first signature slot.
pub(crate) fn sign_transaction(tx_bytes: &[u8], secret_key: &[u8; 32]) -> EngineResult<Vec<u8>> {
    let first = *tx_bytes.first().ok_or("Empty transaction")?;

    // High bit on byte 0 marks a versioned transaction prefix.
    let prefix_len = usize::from(first >= 0x80);

    let (num_sigs, header_len) = read_compact_u16(&tx_bytes[prefix_len..])?;
    if num_sigs == 0 {
        return Err(EngineError::Other("Transaction requires 0 signatures".into()));
    }

    let sigs_start = prefix_len + header_len;
    let sigs_end = sigs_start + num_sigs as usize * 64;
    if sigs_end > tx_bytes.len() {
        return Err(EngineError::Other(format!(
            "Transaction too short: need {} bytes for {} signatures, have {}",
            sigs_end, num_sigs, tx_bytes.len()
        )));
    }

    let message = &tx_bytes[sigs_end..];
    let signing_key = SigningKey::from_bytes(secret_key);

    let signature = if prefix_len == 1 {
        let mut signable = Vec::with_capacity(1 + message.len());
        signable.push(first);
        signable.extend_from_slice(message);
        signing_key.sign(&signable)
    } else {
        signing_key.sign(message)
    };

    let mut signed = tx_bytes.to_vec();
    signed[sigs_start..sigs_start + 64].copy_from_slice(&signature.to_bytes());
    Ok(signed)
}
