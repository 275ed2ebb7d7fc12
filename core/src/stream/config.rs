//! Runtime policy for one encrypt or decrypt operation.

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_EXTRA_LEN, MAX_CHUNK_SIZE};
use crate::crypto::{Scheme, TAG_LEN};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Plaintext bytes per chunk when encrypting; upper bound on a chunk's
    /// plaintext when decrypting.
    pub max_chunk_size: usize,

    /// Upper bound on the extra metadata blob, in both directions.
    pub max_extra_len: usize,

    /// Scheme used to seal chunks when encrypting. Decryption follows the
    /// scheme each chunk declares.
    pub scheme: Scheme,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_CHUNK_SIZE,
            max_extra_len: DEFAULT_MAX_EXTRA_LEN,
            scheme: Scheme::Aes256Gcm,
        }
    }
}

impl CodecConfig {
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    pub fn with_max_extra_len(mut self, len: usize) -> Self {
        self.max_extra_len = len;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.max_chunk_size == 0 || self.max_chunk_size > MAX_CHUNK_SIZE {
            return Err(StreamError::Config(format!(
                "max_chunk_size must be in 1..={MAX_CHUNK_SIZE}, got {}",
                self.max_chunk_size
            )));
        }
        Ok(())
    }

    /// Largest sealed payload a chunk header may declare.
    #[inline]
    pub fn max_ciphertext_len(&self) -> u64 {
        (self.max_chunk_size + TAG_LEN) as u64
    }

    /// Capacity of the per-operation scratch buffer.
    #[inline]
    pub(crate) fn scratch_capacity(&self) -> usize {
        self.max_chunk_size + TAG_LEN
    }
}
