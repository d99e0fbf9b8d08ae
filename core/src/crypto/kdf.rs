//! crypto/kdf.rs
//! HKDF-based channel key derivation from a master secret.
//!
//! Design:
//! - HKDF-Extract(salt, master) -> PRK
//! - HKDF-Expand(PRK, info) -> channel key (32 bytes)
//!
//! Lets configuration carry an arbitrary-length shared secret instead of a raw
//! 32-byte key. `info` binds the key to this protocol.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::constants::KDF_INFO_CHANNEL;
use crate::crypto::types::{CryptoError, SessionKey, KEY_LEN_32};

/// Derive a 32-byte key from `master` with HKDF-SHA256.
///
/// Errors:
/// - Empty `master` is rejected; an empty secret is never a valid key source.
pub fn derive_key_32(master: &[u8], salt: Option<&[u8]>, info: &[u8]) -> Result<SessionKey, CryptoError> {
    if master.is_empty() {
        return Err(CryptoError::Failure("master secret must not be empty".into()));
    }

    let hk = Hkdf::<Sha256>::new(salt, master);
    let mut key = [0u8; KEY_LEN_32];
    hk.expand(info, &mut key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
    Ok(SessionKey::from_bytes(key))
}

impl SessionKey {
    /// Derive a channel key from a shared secret using the protocol's info label.
    pub fn derive(master: &[u8], salt: Option<&[u8]>) -> Result<Self, CryptoError> {
        derive_key_32(master, salt, KDF_INFO_CHANNEL)
    }
}
