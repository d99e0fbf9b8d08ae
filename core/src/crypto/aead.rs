//! crypto/aead.rs
//! AEAD interface for AES-256-GCM and ChaCha20-Poly1305.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Every message is sealed independently under a fresh random nonce, which is
//!   carried in front of the ciphertext: `nonce(12) || ciphertext || tag(16)`.
//! - Tag verification must fail closed (no partial plaintext).

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

use crate::crypto::nonce::{random_nonce_12, validate_nonce};
use crate::crypto::types::{CipherSuite, CryptoError, SessionKey};
use crate::crypto::types::{KEY_LEN_32, NONCE_LEN_12, SEAL_OVERHEAD};

/// Unified AEAD cipher implementation selected by `CipherSuite`.
#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    /// Construct the AEAD for `suite` keyed with `key`.
    pub fn new(suite: CipherSuite, key: &SessionKey) -> Result<Self, CryptoError> {
        match suite {
            CipherSuite::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
                    .map_err(|_| CryptoError::InvalidKeyLen {
                        expected: KEY_LEN_32,
                        actual: key.as_bytes().len(),
                    })?;
                Ok(Self::AesGcm(cipher))
            }
            CipherSuite::Chacha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
                    .map_err(|_| CryptoError::InvalidKeyLen {
                        expected: KEY_LEN_32,
                        actual: key.as_bytes().len(),
                    })?;
                Ok(Self::ChaCha(cipher))
            }
        }
    }

    pub fn suite(&self) -> CipherSuite {
        match self {
            AeadImpl::AesGcm(_) => CipherSuite::Aes256Gcm,
            AeadImpl::ChaCha(_) => CipherSuite::Chacha20Poly1305,
        }
    }

    /// AEAD seal (encrypt) plaintext with an explicit nonce and AAD.
    /// Returns `ciphertext || tag`.
    pub fn seal_with_nonce(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        validate_nonce(nonce_12)?;

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt(AesNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into())),
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt(ChaNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into())),
        }
    }

    /// AEAD open (decrypt) `ciphertext || tag` with an explicit nonce and AAD.
    pub fn open_with_nonce(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if nonce_12.len() != NONCE_LEN_12 {
            return Err(CryptoError::InvalidNonceLen {
                expected: NONCE_LEN_12,
                actual: nonce_12.len(),
            });
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .decrypt(AesNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::TagMismatch),
            AeadImpl::ChaCha(cipher) => cipher
                .decrypt(ChaNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::TagMismatch),
        }
    }

    /// Seal a whole message under a fresh random nonce.
    ///
    /// Output layout: `nonce(12) || ciphertext || tag(16)`. Empty plaintexts are
    /// allowed and produce a 28-byte sealed message.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = random_nonce_12();
        let body = self.seal_with_nonce(&nonce, &[], plaintext)?;

        let mut out = Vec::with_capacity(NONCE_LEN_12 + body.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Open a message produced by [`AeadImpl::seal`].
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < SEAL_OVERHEAD {
            return Err(CryptoError::Truncated { len: sealed.len() });
        }
        let (nonce, body) = sealed.split_at(NONCE_LEN_12);
        self.open_with_nonce(nonce, &[], body)
    }
}
