//! crypto/aad.rs
//! Additional authenticated data for one chunk.
//!
//! AAD = chunk kind (1 byte) || chunk counter (4 bytes, big-endian).
//!
//! The counter binds every ciphertext to its position: a chunk that is
//! moved, repeated or dropped is opened against the wrong counter and fails
//! authentication. The kind byte stops a data chunk from being relabelled
//! as extra metadata (or the reverse) without detection.

use byteorder::{BigEndian, ByteOrder};

use crate::framing::ChunkKind;

pub const AAD_LEN: usize = 1 + 4;

#[inline]
pub fn build_aad(kind: ChunkKind, counter: u32) -> [u8; AAD_LEN] {
    let mut out = [0u8; AAD_LEN];
    out[0] = kind as u8;
    BigEndian::write_u32(&mut out[1..], counter);
    out
}
