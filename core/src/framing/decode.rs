use std::io::Read;

use crate::constants::{CHUNK_TAG, MAX_NONCE_LEN};
use crate::framing::types::{ChunkError, ChunkHeader, ChunkKind, Nonce};
use crate::framing::varint::decode_uvarint;
use crate::stream::io::{read_exact_or_truncated, read_full};
use crate::types::StreamError;

const CONTEXT: &str = "chunk header";

/// Read one chunk header from `r`.
///
/// Checks, in wire order:
/// - the tag, before any other field is trusted
/// - kind and scheme against their registries
/// - nonce length against `MAX_NONCE_LEN`
/// - the declared ciphertext length against `max_ciphertext_len`
///
/// A source that is already at EOF yields `UnexpectedEndOfStream`; one
/// that ends inside the header yields `Truncated`.
pub fn read_chunk_header<R: Read>(r: &mut R, max_ciphertext_len: u64) -> Result<ChunkHeader, StreamError> {
    // --- tag ---
    let mut tag = [0u8; 2];
    let n = read_full(r, &mut tag)?;
    if n == 0 {
        return Err(StreamError::UnexpectedEndOfStream);
    }
    if n < tag.len() {
        return Err(StreamError::Truncated {
            context: CONTEXT,
            expected: tag.len() as u64,
            actual: n as u64,
        });
    }
    if tag != CHUNK_TAG {
        return Err(ChunkError::InvalidTag(tag).into());
    }

    // --- kind, scheme, nonce length ---
    let mut fixed = [0u8; 3];
    read_exact_or_truncated(r, &mut fixed, CONTEXT)?;

    let kind = ChunkKind::try_from_u8(fixed[0])?;
    let scheme = fixed[1];
    let nonce_len = fixed[2] as usize;
    if nonce_len > MAX_NONCE_LEN {
        return Err(ChunkError::InvalidNonceLength(nonce_len).into());
    }

    // --- nonce ---
    let mut nonce_buf = [0u8; MAX_NONCE_LEN];
    read_exact_or_truncated(r, &mut nonce_buf[..nonce_len], CONTEXT)?;
    let nonce = Nonce::from_slice(&nonce_buf[..nonce_len])?;

    // --- ciphertext length ---
    let ciphertext_len = decode_uvarint(|| {
        let mut b = [0u8; 1];
        read_exact_or_truncated(r, &mut b, CONTEXT)?;
        Ok::<u8, StreamError>(b[0])
    })?;

    if ciphertext_len > max_ciphertext_len {
        return Err(ChunkError::OversizedChunk {
            have: ciphertext_len,
            max: max_ciphertext_len,
        }
        .into());
    }

    let header = ChunkHeader {
        kind: kind as u8,
        scheme,
        nonce,
        ciphertext_len,
    };
    header.validate()?;

    Ok(header)
}

/// Parse a chunk header from the front of `buf`; returns it with its
/// encoded length.
pub fn decode_chunk_header(buf: &[u8], max_ciphertext_len: u64) -> Result<(ChunkHeader, usize), StreamError> {
    let mut cursor = std::io::Cursor::new(buf);
    let header = read_chunk_header(&mut cursor, max_ciphertext_len)?;
    Ok((header, cursor.position() as usize))
}
