//! src/headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Deserializes the fixed 14-byte buffer into a `StreamHeader`.
//! - Validation runs right after decoding; a header that fails it is never
//!   handed to the decrypt loop.

use std::io::Read;

use crate::headers::types::{StreamHeader, HeaderError, HEADER_LEN};
use crate::stream::io::read_full;
use crate::types::StreamError;

#[inline]
pub fn decode_stream_header(buf: &[u8]) -> Result<StreamHeader, HeaderError> {
    if buf.len() < HEADER_LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: HEADER_LEN });
    }

    let mut i = 0usize;
    #[inline] fn get_u8(buf: &[u8], i: &mut usize) -> u8 { let v = buf[*i]; *i += 1; v }
    #[inline] fn get_bytes<const N: usize>(buf: &[u8], i: &mut usize) -> [u8; N] {
        let mut dst = [0u8; N]; dst.copy_from_slice(&buf[*i..*i + N]); *i += N; dst
    }

    let h = StreamHeader {
        size:      get_u8(buf, &mut i),            // 0      declared size
        magic:     get_bytes::<2>(buf, &mut i),    // 1..3   magic
        scheme:    get_bytes::<9>(buf, &mut i),    // 3..12  scheme name
        ver_major: get_u8(buf, &mut i),            // 12     major version
        ver_minor: get_u8(buf, &mut i),            // 13     minor version
    };
    debug_assert_eq!(i, HEADER_LEN);

    h.validate()?;

    Ok(h)
}

/// Read and validate the stream header.
///
/// A source that ends before all 14 bytes arrived is reported as
/// `StreamError::Truncated`; the missing bytes are never zero-filled.
pub fn read_stream_header<R: Read>(r: &mut R) -> Result<StreamHeader, StreamError> {
    let mut buf = [0u8; HEADER_LEN];
    let n = read_full(r, &mut buf)?;
    if n < HEADER_LEN {
        return Err(StreamError::Truncated {
            context: "stream header",
            expected: HEADER_LEN as u64,
            actual: n as u64,
        });
    }
    Ok(decode_stream_header(&buf)?)
}
