//! Unsigned LEB128 varints for the chunk length field.
//!
//! 7 bits per byte, least significant group first, high bit set on every
//! byte but the last. A u64 needs at most 10 bytes.

use crate::framing::types::ChunkError;

pub const MAX_VARINT_LEN: usize = 10;

/// Encode `v` into `out`, returning the number of bytes written.
///
/// `out` must hold at least `MAX_VARINT_LEN` bytes.
#[inline]
pub fn encode_uvarint(mut v: u64, out: &mut [u8]) -> usize {
    let mut i = 0;
    while v >= 0x80 {
        out[i] = (v as u8) | 0x80;
        v >>= 7;
        i += 1;
    }
    out[i] = v as u8;
    i + 1
}

/// Encoded length of `v` in bytes.
#[inline]
pub const fn uvarint_len(v: u64) -> usize {
    let bits = 64 - (v | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Decode one varint, pulling bytes from `next`.
///
/// Rejects encodings longer than 10 bytes, values above `u64::MAX` and
/// non-minimal encodings (a trailing zero group).
pub fn decode_uvarint<E, F>(mut next: F) -> Result<u64, E>
where
    F: FnMut() -> Result<u8, E>,
    E: From<ChunkError>,
{
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for i in 0..MAX_VARINT_LEN {
        let b = next()?;
        if b < 0x80 {
            if i == MAX_VARINT_LEN - 1 && b > 1 {
                return Err(ChunkError::MalformedLength.into());
            }
            if i > 0 && b == 0 {
                return Err(ChunkError::MalformedLength.into());
            }
            return Ok(value | (u64::from(b) << shift));
        }
        value |= u64::from(b & 0x7f) << shift;
        shift += 7;
    }

    Err(ChunkError::MalformedLength.into())
}

/// Slice flavour of [`decode_uvarint`]; returns the value and bytes consumed.
pub fn decode_uvarint_slice(buf: &[u8]) -> Result<(u64, usize), ChunkError> {
    let mut pos = 0usize;
    let v = decode_uvarint(|| {
        let b = *buf.get(pos).ok_or(ChunkError::MalformedLength)?;
        pos += 1;
        Ok::<u8, ChunkError>(b)
    })?;
    Ok((v, pos))
}
