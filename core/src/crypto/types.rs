use num_enum::TryFromPrimitive;
use thiserror::Error;

/// Derived symmetric key size.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Cipher schemes (chunk header registry).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Scheme {
    Aes256Gcm        = 0x01,
    ChaCha20Poly1305 = 0x02,
}

impl Scheme {
    #[inline]
    pub fn try_from_u8(raw: u8) -> Result<Self, CryptoError> {
        Scheme::try_from_primitive(raw).map_err(|_| CryptoError::UnsupportedScheme { raw })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Scheme::Aes256Gcm        => "aes256gcm",
            Scheme::ChaCha20Poly1305 => "chacha20poly1305",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Scheme id with no cipher behind it.
    #[error("unsupported scheme: 0x{raw:02x}")]
    UnsupportedScheme { raw: u8 },

    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    /// AEAD tag mismatch: wrong key, tampered bytes, or a chunk out of sequence.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// General runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}
