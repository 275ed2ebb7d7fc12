//! crypto/nonce.rs
//! Per-chunk nonce construction.
//!
//! Design:
//! - 12-byte nonce = chunk counter (4 bytes, big-endian) || 8 random bytes.
//! - The counter prefix keeps nonces distinct inside one stream; the random
//!   tail keeps them distinct across streams sealed under the same secret,
//!   since the key derivation is unsalted.
//!
//! Security notes:
//! - Random bytes come from the OS CSPRNG. A failing RNG aborts the stream
//!   rather than falling back to a weaker source.

use byteorder::{BigEndian, ByteOrder};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::types::{CryptoError, NONCE_LEN_12};

/// Width of the counter prefix.
pub const COUNTER_PREFIX_LEN: usize = 4;

/// Build the nonce for the chunk at position `counter`.
#[inline]
pub fn build_nonce_12(counter: u32) -> Result<[u8; NONCE_LEN_12], CryptoError> {
    let mut nonce = [0u8; NONCE_LEN_12];
    BigEndian::write_u32(&mut nonce[..COUNTER_PREFIX_LEN], counter);
    fill_random(&mut nonce[COUNTER_PREFIX_LEN..])?;
    Ok(nonce)
}

/// Fully random nonce, used by the terminator chunk.
#[inline]
pub fn random_nonce_12() -> Result<[u8; NONCE_LEN_12], CryptoError> {
    let mut nonce = [0u8; NONCE_LEN_12];
    fill_random(&mut nonce)?;
    Ok(nonce)
}

/// Counter prefix of a nonce produced by [`build_nonce_12`].
#[inline]
pub fn nonce_counter(nonce: &[u8]) -> Option<u32> {
    if nonce.len() != NONCE_LEN_12 {
        return None;
    }
    Some(BigEndian::read_u32(&nonce[..COUNTER_PREFIX_LEN]))
}

fn fill_random(dst: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(dst)
        .map_err(|e| CryptoError::Failure(format!("OS random source failed: {e}")))
}
