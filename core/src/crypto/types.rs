use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::cipher_ids;
use crate::utils::enum_name_or_hex;

/// Stable key and nonce sizes.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Bytes a sealed message adds on top of its plaintext: nonce prefix + tag.
pub const SEAL_OVERHEAD: usize = NONCE_LEN_12 + TAG_LEN;

/// Supported AEAD suites, keyed by their wire ids.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
pub enum CipherSuite {
    #[default]
    Aes256Gcm        = 0x0001, // cipher_ids::AES256_GCM
    Chacha20Poly1305 = 0x0002, // cipher_ids::CHACHA20_POLY1305
}

impl CipherSuite {
    pub const fn id(self) -> u16 {
        match self {
            CipherSuite::Aes256Gcm => cipher_ids::AES256_GCM,
            CipherSuite::Chacha20Poly1305 => cipher_ids::CHACHA20_POLY1305,
        }
    }

    /// Parse a user-facing name (`aes-256-gcm`, `chacha20-poly1305`) or a numeric id.
    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm" | "aes256gcm" | "aes" => Ok(Self::Aes256Gcm),
            "chacha20-poly1305" | "chacha20poly1305" | "chacha" => Ok(Self::Chacha20Poly1305),
            other => {
                let raw = other.parse::<u16>()
                    .map_err(|_| CryptoError::Failure(format!("unknown cipher suite name: {other}")))?;
                Self::try_from(raw).map_err(|_| CryptoError::UnsupportedCipher { cipher_id: raw })
            }
        }
    }
}

/// 32-byte symmetric key shared by both directions of a channel.
///
/// There is deliberately no `Default`: callers must supply key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; KEY_LEN_32]);

impl SessionKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN_32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_LEN_32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Parse 64 hex characters.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| CryptoError::Failure(format!("invalid key hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Fresh random key from the OS generator.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut arr = [0u8; KEY_LEN_32];
        rand::rngs::OsRng.fill_bytes(&mut arr);
        Self(arr)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN_32] {
        &self.0
    }
}

// Never print key material.
impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Unsupported cipher suite id.
    #[error("unsupported cipher suite: {}", enum_name_or_hex::<CipherSuite>(*cipher_id))]
    UnsupportedCipher { cipher_id: u16 },

    /// Invalid key length provided to cipher.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// Nonce length mismatch (must be 12 bytes for supported ciphers).
    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    /// Sealed message shorter than nonce + tag.
    #[error("sealed message too short: {len} bytes")]
    Truncated { len: usize },

    /// AEAD tag mismatch (wrong key or corrupted ciphertext).
    #[error("AEAD tag mismatch")]
    TagMismatch,

    /// General derivation or runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}
