// This suite validates:
//
// * seal/open round-trip for both suites
// * fresh nonce per message
// * tamper and wrong-key detection
// * key parsing and HKDF derivation

#[cfg(test)]
mod tests {
    use netkit_core::crypto::{
        AeadImpl, CipherSuite, CryptoError, SessionKey, KEY_LEN_32, NONCE_LEN_12, SEAL_OVERHEAD,
    };
    use proptest::prelude::*;

    fn test_key() -> SessionKey {
        SessionKey::from_bytes([0x42u8; KEY_LEN_32])
    }

    // ✅ 1. Seal → open round-trip, both suites
    #[test]
    fn seal_open_roundtrip() {
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let aead = AeadImpl::new(suite, &test_key()).unwrap();
            let sealed = aead.seal(b"hello world").unwrap();
            assert_eq!(sealed.len(), b"hello world".len() + SEAL_OVERHEAD);
            assert_eq!(aead.open(&sealed).unwrap(), b"hello world");
            assert_eq!(aead.suite(), suite);
        }
    }

    // ✅ 2. Empty payloads are fine
    #[test]
    fn empty_payload_roundtrip() {
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        let sealed = aead.seal(b"").unwrap();
        assert_eq!(sealed.len(), SEAL_OVERHEAD);
        assert!(aead.open(&sealed).unwrap().is_empty());
    }

    // ✅ 3. Independent messages: same plaintext, different nonce and ciphertext
    #[test]
    fn every_seal_uses_a_fresh_nonce() {
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        let a = aead.seal(b"same").unwrap();
        let b = aead.seal(b"same").unwrap();
        assert_ne!(a[..NONCE_LEN_12], b[..NONCE_LEN_12]);
        assert_ne!(a, b);
    }

    // ❌ 4. Tampered ciphertext fails authentication
    #[test]
    fn tampered_ciphertext_is_rejected() {
        let aead = AeadImpl::new(CipherSuite::Chacha20Poly1305, &test_key()).unwrap();
        let mut sealed = aead.seal(b"secure").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(matches!(aead.open(&sealed), Err(CryptoError::TagMismatch)));
    }

    // ❌ 5. Wrong key fails
    #[test]
    fn wrong_key_is_rejected() {
        let enc = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        let dec = AeadImpl::new(CipherSuite::Aes256Gcm, &SessionKey::from_bytes([0x99; 32])).unwrap();
        let sealed = enc.seal(b"secret").unwrap();
        assert!(matches!(dec.open(&sealed), Err(CryptoError::TagMismatch)));
    }

    // ❌ 6. Suite mismatch fails
    #[test]
    fn suite_mismatch_is_rejected() {
        let enc = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        let dec = AeadImpl::new(CipherSuite::Chacha20Poly1305, &test_key()).unwrap();
        let sealed = enc.seal(b"secret").unwrap();
        assert!(dec.open(&sealed).is_err());
    }

    // ❌ 7. Too short to hold nonce + tag
    #[test]
    fn truncated_message_is_rejected() {
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        assert!(matches!(
            aead.open(&[0u8; SEAL_OVERHEAD - 1]),
            Err(CryptoError::Truncated { len }) if len == SEAL_OVERHEAD - 1
        ));
    }

    // ❌ 8. Explicit nonces are validated
    #[test]
    fn bad_explicit_nonce_is_rejected() {
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
        assert!(matches!(
            aead.seal_with_nonce(&[1u8; 8], &[], b"x"),
            Err(CryptoError::InvalidNonceLen { expected: 12, actual: 8 })
        ));
        assert!(aead.seal_with_nonce(&[0u8; 12], &[], b"x").is_err());
    }

    #[test]
    fn explicit_nonce_and_aad_roundtrip() {
        let aead = AeadImpl::new(CipherSuite::Chacha20Poly1305, &test_key()).unwrap();
        let nonce = [7u8; 12];
        let ct = aead.seal_with_nonce(&nonce, b"aad", b"body").unwrap();
        assert_eq!(aead.open_with_nonce(&nonce, b"aad", &ct).unwrap(), b"body");
        assert!(aead.open_with_nonce(&nonce, b"other", &ct).is_err());
    }

    #[test]
    fn key_from_hex_and_slice() {
        let key = SessionKey::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; 32]);

        assert!(matches!(
            SessionKey::from_hex("abcd"),
            Err(CryptoError::InvalidKeyLen { expected: 32, actual: 2 })
        ));
        assert!(SessionKey::from_hex("zz").is_err());
        assert!(SessionKey::from_slice(&[0u8; 31]).is_err());
    }

    #[test]
    fn key_debug_is_redacted() {
        let rendered = format!("{:?}", SessionKey::from_bytes([0x42; 32]));
        assert!(!rendered.contains("42"));
    }

    #[test]
    fn derivation_is_deterministic_and_salt_sensitive() {
        let a = SessionKey::derive(b"shared secret", Some(b"salt-1")).unwrap();
        let b = SessionKey::derive(b"shared secret", Some(b"salt-1")).unwrap();
        let c = SessionKey::derive(b"shared secret", Some(b"salt-2")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(SessionKey::derive(b"", None).is_err());
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(SessionKey::generate(), SessionKey::generate());
    }

    #[test]
    fn cipher_suite_names() {
        assert_eq!(CipherSuite::from_name("AES-256-GCM").unwrap(), CipherSuite::Aes256Gcm);
        assert_eq!(CipherSuite::from_name("chacha").unwrap(), CipherSuite::Chacha20Poly1305);
        assert_eq!(CipherSuite::from_name("2").unwrap(), CipherSuite::Chacha20Poly1305);
        assert!(matches!(
            CipherSuite::from_name("9"),
            Err(CryptoError::UnsupportedCipher { cipher_id: 9 })
        ));
        assert_eq!(CipherSuite::Chacha20Poly1305.id(), 0x0002);
    }

    proptest! {
        #[test]
        fn prop_open_inverts_seal(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &test_key()).unwrap();
            let sealed = aead.seal(&payload).unwrap();
            prop_assert_eq!(aead.open(&sealed).unwrap(), payload);
        }
    }
}
