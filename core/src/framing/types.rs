use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::{MAX_NONCE_LEN, CHUNK_TAG};
use crate::crypto::Scheme;
use crate::framing::varint::{uvarint_len, MAX_VARINT_LEN};

/// Chunk kind identifiers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum ChunkKind {
    Data       = 0x01,
    Extra      = 0xF0,
    Terminator = 0xF1,
}

impl ChunkKind {
    #[inline(always)]
    pub fn try_from_u8(v: u8) -> Result<Self, ChunkError> {
        ChunkKind::try_from_primitive(v).map_err(|_| ChunkError::InvalidChunkKind(v))
    }

    /// Whether chunks of this kind carry a sealed payload.
    #[inline(always)]
    pub const fn has_payload(self) -> bool {
        !matches!(self, ChunkKind::Terminator)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ChunkKind::Data       => "data",
            ChunkKind::Extra      => "extra",
            ChunkKind::Terminator => "terminator",
        }
    }
}

/// Nonce bytes carried inline, up to `MAX_NONCE_LEN`.
#[derive(Clone, Copy)]
pub struct Nonce {
    bytes: [u8; MAX_NONCE_LEN],
    len: u8,
}

impl Nonce {
    pub fn from_slice(b: &[u8]) -> Result<Self, ChunkError> {
        if b.len() > MAX_NONCE_LEN {
            return Err(ChunkError::InvalidNonceLength(b.len()));
        }
        let mut bytes = [0u8; MAX_NONCE_LEN];
        bytes[..b.len()].copy_from_slice(b);
        Ok(Self { bytes, len: b.len() as u8 })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for Nonce {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Nonce {}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce(0x{})", hex::encode(self.as_bytes()))
    }
}

/// Per-chunk descriptor.
///
/// `kind` and `scheme` stay raw so a header built from untrusted values can
/// still be represented and rejected by `validate()` before it reaches the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub kind: u8,
    pub scheme: u8,
    pub nonce: Nonce,
    /// Sealed payload length (ciphertext + tag); zero for the terminator.
    pub ciphertext_len: u64,
}

impl ChunkHeader {
    /// Upper bound on one encoded header.
    pub const MAX_LEN: usize = CHUNK_TAG.len() // tag
        + 1                                    // kind
        + 1                                    // scheme
        + 1                                    // nonce length
        + MAX_NONCE_LEN                        // nonce
        + MAX_VARINT_LEN;                      // ciphertext length

    pub fn new(kind: ChunkKind, scheme: Scheme, nonce: &[u8], ciphertext_len: u64) -> Result<Self, ChunkError> {
        Ok(Self {
            kind: kind as u8,
            scheme: scheme as u8,
            nonce: Nonce::from_slice(nonce)?,
            ciphertext_len,
        })
    }

    pub fn terminator(scheme: Scheme, nonce: &[u8]) -> Result<Self, ChunkError> {
        Self::new(ChunkKind::Terminator, scheme, nonce, 0)
    }

    /// Length of this header on the wire.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        CHUNK_TAG.len() + 3 + self.nonce.len() + uvarint_len(self.ciphertext_len)
    }

    #[inline]
    pub fn kind(&self) -> Result<ChunkKind, ChunkError> {
        ChunkKind::try_from_u8(self.kind)
    }

    #[inline]
    pub fn scheme(&self) -> Result<Scheme, ChunkError> {
        Scheme::try_from_u8(self.scheme).map_err(|_| ChunkError::InvalidScheme(self.scheme))
    }

    pub fn validate(&self) -> Result<(), ChunkError> {
        let kind = self.kind()?;
        self.scheme()?;

        if self.nonce.len() > MAX_NONCE_LEN {
            return Err(ChunkError::InvalidNonceLength(self.nonce.len()));
        }
        if !kind.has_payload() && self.ciphertext_len != 0 {
            return Err(ChunkError::NonEmptyTerminator(self.ciphertext_len));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("invalid chunk tag: {}", hex::encode(.0))]
    InvalidTag([u8; 2]),

    #[error("invalid chunk kind: 0x{0:02x}")]
    InvalidChunkKind(u8),

    #[error("invalid scheme id: 0x{0:02x}")]
    InvalidScheme(u8),

    #[error("invalid nonce length: {0} (max {max})", max = MAX_NONCE_LEN)]
    InvalidNonceLength(usize),

    #[error("oversized chunk: {have} > {max}")]
    OversizedChunk { have: u64, max: u64 },

    #[error("malformed ciphertext length varint")]
    MalformedLength,

    #[error("terminator chunk declares a {0}-byte payload")]
    NonEmptyTerminator(u64),
}
