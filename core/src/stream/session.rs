//! src/stream/session.rs
//!
//! Cipher state for one encrypt or decrypt operation.
//!
//! The session owns the resolved AEAD and the chunk counter. Both engines
//! pass it by `&mut` through their loops; nothing here is shared between
//! operations.

use tracing::warn;

use crate::crypto::{
    build_aad, build_nonce_12, resolve, AeadImpl, Scheme, NONCE_LEN_12,
};
use crate::framing::ChunkKind;
use crate::types::StreamError;

/// Counter value bound to the first sealed chunk of a stream.
pub const FIRST_COUNTER: u32 = 1;

pub struct CipherSession<'k> {
    /// Kept only to re-resolve the cipher when a chunk switches scheme.
    secret_key: &'k str,
    aead: AeadImpl,
    counter: u32,
}

impl<'k> CipherSession<'k> {
    pub fn new(secret_key: &'k str, scheme: Scheme) -> Result<Self, StreamError> {
        let aead = resolve(secret_key, scheme)?;
        Ok(Self {
            secret_key,
            aead,
            counter: FIRST_COUNTER,
        })
    }

    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.aead.scheme()
    }

    /// Counter the next sealed or opened chunk is bound to.
    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Switch to `scheme` if it differs from the active one.
    ///
    /// Returns `true` when the cipher was re-resolved.
    pub fn ensure_scheme(&mut self, scheme: Scheme) -> Result<bool, StreamError> {
        if scheme == self.scheme() {
            return Ok(false);
        }
        warn!(
            from = %self.scheme(),
            to = %scheme,
            counter = self.counter,
            "chunk scheme differs from session, re-resolving cipher"
        );
        self.aead = resolve(self.secret_key, scheme)?;
        Ok(true)
    }

    /// Claim the current counter and advance it.
    fn next_counter(&mut self) -> Result<u32, StreamError> {
        let current = self.counter;
        self.counter = current
            .checked_add(1)
            .ok_or(StreamError::CounterExhausted)?;
        Ok(current)
    }

    /// Seal `buf` in place as a chunk of `kind`; returns the nonce used.
    pub fn seal_chunk(
        &mut self,
        kind: ChunkKind,
        buf: &mut Vec<u8>,
    ) -> Result<[u8; NONCE_LEN_12], StreamError> {
        let counter = self.next_counter()?;
        let nonce = build_nonce_12(counter)?;
        let aad = build_aad(kind, counter);
        self.aead.seal_in_place(&nonce, &aad, buf)?;
        Ok(nonce)
    }

    /// Open `buf` in place as a chunk of `kind` at the expected position.
    pub fn open_chunk(
        &mut self,
        kind: ChunkKind,
        nonce: &[u8],
        buf: &mut Vec<u8>,
    ) -> Result<(), StreamError> {
        let counter = self.next_counter()?;
        let aad = build_aad(kind, counter);
        self.aead.open_in_place(nonce, &aad, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_one_and_advances() {
        let mut s = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();
        assert_eq!(s.counter(), 1);
        let mut buf = b"abc".to_vec();
        let nonce = s.seal_chunk(ChunkKind::Data, &mut buf).unwrap();
        assert_eq!(&nonce[..4], &[0, 0, 0, 1]);
        assert_eq!(s.counter(), 2);
    }

    #[test]
    fn sealed_chunk_opens_at_same_position() {
        let mut enc = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();
        let mut dec = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();

        let mut buf = b"payload".to_vec();
        let nonce = enc.seal_chunk(ChunkKind::Data, &mut buf).unwrap();
        dec.open_chunk(ChunkKind::Data, &nonce, &mut buf).unwrap();
        assert_eq!(buf, b"payload");
    }

    #[test]
    fn wrong_kind_fails_to_open() {
        let mut enc = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();
        let mut dec = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();

        let mut buf = b"payload".to_vec();
        let nonce = enc.seal_chunk(ChunkKind::Data, &mut buf).unwrap();
        let err = dec.open_chunk(ChunkKind::Extra, &nonce, &mut buf).unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn ensure_scheme_switches_once() {
        let mut s = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();
        assert!(!s.ensure_scheme(Scheme::Aes256Gcm).unwrap());
        assert!(s.ensure_scheme(Scheme::ChaCha20Poly1305).unwrap());
        assert_eq!(s.scheme(), Scheme::ChaCha20Poly1305);
        assert!(!s.ensure_scheme(Scheme::ChaCha20Poly1305).unwrap());
    }

    #[test]
    fn counter_exhaustion_is_reported() {
        let mut s = CipherSession::new("k", Scheme::Aes256Gcm).unwrap();
        s.counter = u32::MAX;
        let mut buf = b"x".to_vec();
        assert!(matches!(
            s.seal_chunk(ChunkKind::Data, &mut buf),
            Err(StreamError::CounterExhausted)
        ));
    }
}
