//! crypto/nonce.rs
//! Per-message nonce generation.
//!
//! Messages on a channel carry no shared counter, so every seal draws a fresh
//! 96-bit nonce from the OS generator and ships it in front of the ciphertext.
//!
//! Security notes:
//! - Never reuse a (key, nonce) pair. With random 96-bit nonces the collision
//!   bound is ~2^32 messages per key; rotate keys well before that.
//! - All-zero nonces are rejected when validating caller-supplied values.

use rand::RngCore;

use crate::crypto::types::{CryptoError, NONCE_LEN_12};

/// Draw a random 12-byte nonce.
#[inline]
pub fn random_nonce_12() -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Validate a caller-supplied nonce: exact length, not all zeros.
#[inline]
pub fn validate_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_LEN_12 {
        return Err(CryptoError::InvalidNonceLen {
            expected: NONCE_LEN_12,
            actual: nonce.len(),
        });
    }
    if nonce.iter().all(|&b| b == 0) {
        return Err(CryptoError::Failure("nonce must not be all-zero".into()));
    }
    Ok(())
}
