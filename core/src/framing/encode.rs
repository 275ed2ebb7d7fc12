use std::io::Write;

use crate::constants::CHUNK_TAG;
use crate::framing::types::{ChunkHeader, ChunkError};
use crate::framing::varint::encode_uvarint;
use crate::types::StreamError;

/// Encode a chunk header into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ tag "ct" (2) ]
/// [ kind (1) ]
/// [ scheme (1) ]
/// [ nonce_len (1) ]
/// [ nonce (nonce_len) ]
/// [ ciphertext_len (uvarint, 1..=10) ]
/// ```
///
/// The header is validated first; nothing is produced for an invalid one.
pub fn encode_chunk_header(h: &ChunkHeader) -> Result<([u8; ChunkHeader::MAX_LEN], usize), ChunkError> {
    h.validate()?;

    let mut out = [0u8; ChunkHeader::MAX_LEN];
    let mut i = 0usize;

    out[i..i + CHUNK_TAG.len()].copy_from_slice(&CHUNK_TAG);
    i += CHUNK_TAG.len();

    out[i] = h.kind;
    out[i + 1] = h.scheme;
    out[i + 2] = h.nonce.len() as u8;
    i += 3;

    let nonce = h.nonce.as_bytes();
    out[i..i + nonce.len()].copy_from_slice(nonce);
    i += nonce.len();

    i += encode_uvarint(h.ciphertext_len, &mut out[i..]);

    Ok((out, i))
}

/// Write a chunk header with one `write_all`; returns the encoded length.
pub fn write_chunk_header<W: Write>(w: &mut W, h: &ChunkHeader) -> Result<usize, StreamError> {
    let (buf, len) = encode_chunk_header(h)?;
    w.write_all(&buf[..len])?;
    Ok(len)
}
