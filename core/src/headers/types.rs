//! headers/types.rs
//! Stream header struct and validation.
//!
//! Notes:
//! - Fixed field sizes keep the wire layout byte-for-byte stable.
//! - `size` is self-declared so a reader can reject a header produced by an
//!   incompatible layout before looking at any other field.
//! - The header is written once, before the first chunk.

use thiserror::Error;

use crate::constants::{STREAM_MAGIC, STREAM_SCHEME, VERSION_MAJOR, VERSION_MINOR};

/// Size of the fields following the `size` byte.
pub const HEADER_BODY_LEN: usize = 2 // magic
    + 9                              // scheme name
    + 1                              // major version
    + 1;                             // minor version

/// Total encoded header length, `size` byte included.
pub const HEADER_LEN: usize = 1 + HEADER_BODY_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub size: u8,          // declared size of the remaining fields
    pub magic: [u8; 2],    // "sc" magic marker
    pub scheme: [u8; 9],   // envelope scheme name
    pub ver_major: u8,
    pub ver_minor: u8,
}

impl Default for StreamHeader {
    /// The only header this implementation writes.
    fn default() -> Self {
        Self {
            size: HEADER_BODY_LEN as u8,
            magic: STREAM_MAGIC,
            scheme: STREAM_SCHEME,
            ver_major: VERSION_MAJOR,
            ver_minor: VERSION_MINOR,
        }
    }
}

impl StreamHeader {
    pub const LEN: usize = HEADER_LEN;

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.size as usize != HEADER_BODY_LEN {
            return Err(HeaderError::InvalidSize {
                have: self.size,
                need: HEADER_BODY_LEN as u8,
            });
        }

        if self.magic != STREAM_MAGIC {
            return Err(HeaderError::InvalidMagic { have: self.magic });
        }

        if self.scheme != STREAM_SCHEME {
            return Err(HeaderError::InvalidScheme { have: self.scheme });
        }

        if self.ver_major != VERSION_MAJOR || self.ver_minor != VERSION_MINOR {
            return Err(HeaderError::UnsupportedVersion {
                major: self.ver_major,
                minor: self.ver_minor,
            });
        }

        Ok(())
    }
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Buffer too short to contain a full header.
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    /// Declared header size does not match the fixed layout.
    #[error("invalid header size: expected {need}, got {have}")]
    InvalidSize { have: u8, need: u8 },

    #[error("invalid magic: expected {}, got {}", fmt_bytes(&STREAM_MAGIC), fmt_bytes(.have))]
    InvalidMagic { have: [u8; 2] },

    #[error("invalid scheme: expected {}, got {}", fmt_bytes(&STREAM_SCHEME), fmt_bytes(.have))]
    InvalidScheme { have: [u8; 9] },

    #[error("unsupported version {major}.{minor} (supported {sup_major}.{sup_minor})", sup_major = VERSION_MAJOR, sup_minor = VERSION_MINOR)]
    UnsupportedVersion { major: u8, minor: u8 },
}
