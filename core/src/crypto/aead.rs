//! src/crypto/aead.rs
//! AEAD interface for AES-256-GCM and ChaCha20-Poly1305, and the cipher
//! provider that resolves a scheme id into one of them.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Sealing and opening work in place on the caller's scratch buffer so a
//!   stream never allocates per chunk.
//! - Tag verification must fail closed: on error the buffer content is
//!   meaningless and must not be emitted.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};                // 32-byte key, 12-byte nonce
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce}; // 32-byte key, 12-byte nonce

use crate::crypto::kdf::derive_key_32;
use crate::crypto::types::{CryptoError, Scheme, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

/// Unified AEAD cipher implementation selected by scheme id.
#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

/// Resolve `scheme` into a ready cipher keyed from `secret_key`.
pub fn resolve(secret_key: &str, scheme: Scheme) -> Result<AeadImpl, CryptoError> {
    let key = derive_key_32(secret_key);
    AeadImpl::from_scheme_and_key(scheme, &key[..])
}

/// Same as [`resolve`] for a raw scheme id read off the wire.
pub fn resolve_raw(secret_key: &str, scheme_id: u8) -> Result<AeadImpl, CryptoError> {
    resolve(secret_key, Scheme::try_from_u8(scheme_id)?)
}

impl AeadImpl {
    pub fn from_scheme_and_key(scheme: Scheme, key: &[u8]) -> Result<Self, CryptoError> {
        let bad_len = || CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        };
        if key.len() != KEY_LEN_32 {
            return Err(bad_len());
        }

        match scheme {
            Scheme::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| bad_len())?;
                Ok(Self::AesGcm(cipher))
            }
            Scheme::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| bad_len())?;
                Ok(Self::ChaCha(cipher))
            }
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            AeadImpl::AesGcm(_) => Scheme::Aes256Gcm,
            AeadImpl::ChaCha(_) => Scheme::ChaCha20Poly1305,
        }
    }

    #[inline]
    pub fn nonce_len(&self) -> usize {
        NONCE_LEN_12
    }

    #[inline]
    pub fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<(), CryptoError> {
        if nonce.len() != self.nonce_len() {
            return Err(CryptoError::InvalidNonceLen {
                expected: self.nonce_len(),
                actual: nonce.len(),
            });
        }
        Ok(())
    }

    /// Seal `buf` in place: plaintext in, ciphertext || tag out.
    pub fn seal_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buf: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        self.check_nonce(nonce)?;

        if buf.is_empty() {
            return Err(CryptoError::Failure("plaintext must not be empty".into()));
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt_in_place(AesNonce::from_slice(nonce), aad, buf)
                .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into())),
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt_in_place(ChaNonce::from_slice(nonce), aad, buf)
                .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into())),
        }
    }

    /// Open `buf` in place: ciphertext || tag in, plaintext out.
    pub fn open_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buf: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        self.check_nonce(nonce)?;

        if buf.len() < self.tag_len() {
            return Err(CryptoError::AuthenticationFailed);
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .decrypt_in_place(AesNonce::from_slice(nonce), aad, buf)
                .map_err(|_| CryptoError::AuthenticationFailed),
            AeadImpl::ChaCha(cipher) => cipher
                .decrypt_in_place(ChaNonce::from_slice(nonce), aad, buf)
                .map_err(|_| CryptoError::AuthenticationFailed),
        }
    }
}

impl std::fmt::Debug for AeadImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print key schedules
        f.debug_tuple("AeadImpl").field(&self.scheme()).finish()
    }
}
