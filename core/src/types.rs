use std::io;

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::framing::ChunkError;
use crate::headers::HeaderError;

/// Unified stream error covering I/O, stream header, chunk framing and crypto.
/// - `From<T>` impls let `?` cross layer boundaries.
/// - Every variant is terminal for the operation that produced it.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Read or write failure on the caller's source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream header failed validation.
    #[error("format error: {0}")]
    Format(#[from] HeaderError),

    /// Chunk header failed validation.
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Source ended inside a structure that declared more bytes.
    #[error("truncated {context}: expected {expected} bytes, got {actual}")]
    Truncated {
        context: &'static str,
        expected: u64,
        actual: u64,
    },

    /// Source ended before the terminator chunk.
    #[error("unexpected end of stream: no terminator")]
    UnexpectedEndOfStream,

    #[error("extra metadata exceeds {max} bytes")]
    OversizedExtra { max: usize },

    /// Extra chunk seen after the first data chunk.
    #[error("extra chunk after data chunk")]
    ExtraAfterData,

    /// Chunk counter would wrap past `u32::MAX`.
    #[error("chunk counter exhausted")]
    CounterExhausted,

    #[error("invalid config: {0}")]
    Config(String),
}

impl StreamError {
    /// True when the error came from a failed AEAD tag check.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, StreamError::Crypto(CryptoError::AuthenticationFailed))
    }
}
