//! src/headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Serializes `StreamHeader` into a fixed 14-byte buffer.
//! - Field order must match `decode.rs` exactly.
//! - Validation is performed before encoding to fail fast on invalid headers.

use std::io::Write;

use crate::headers::types::{StreamHeader, HeaderError, HEADER_LEN};
use crate::types::StreamError;

/// Serialize a `StreamHeader` into its fixed wire form.
#[inline]
pub fn encode_stream_header(h: &StreamHeader) -> Result<[u8; HEADER_LEN], HeaderError> {
    h.validate()?;

    let mut out = [0u8; HEADER_LEN];
    let mut i = 0usize;

    fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
        out[*i..*i + b.len()].copy_from_slice(b);
        *i += b.len();
    }

    put_bytes(&mut out, &mut i, &[h.size]);      // 0      declared size
    put_bytes(&mut out, &mut i, &h.magic);       // 1..3   magic
    put_bytes(&mut out, &mut i, &h.scheme);      // 3..12  scheme name
    put_bytes(&mut out, &mut i, &[h.ver_major]); // 12     major version
    put_bytes(&mut out, &mut i, &[h.ver_minor]); // 13     minor version

    debug_assert_eq!(i, HEADER_LEN, "encoding wrote incorrect length");

    Ok(out)
}

/// Write the stream header with a single `write_all`.
pub fn write_stream_header<W: Write>(w: &mut W, h: &StreamHeader) -> Result<(), StreamError> {
    let buf = encode_stream_header(h)?;
    w.write_all(&buf)?;
    Ok(())
}
