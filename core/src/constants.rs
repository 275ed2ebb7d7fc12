//! Protocol constants and defaults.

/// Stream magic marker ("sc" = sealed chunks).
pub const STREAM_MAGIC: [u8; 2] = *b"sc";

/// Envelope scheme name carried in the stream header.
pub const STREAM_SCHEME: [u8; 9] = *b"aes256gcm";

pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

/// Opening tag of every chunk header.
pub const CHUNK_TAG: [u8; 2] = *b"ct";

/// Hard ceiling on a declared nonce length.
pub const MAX_NONCE_LEN: usize = 128;

/// Defaults when the caller does not override `CodecConfig`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1000; // ~1 MB
pub const DEFAULT_MAX_EXTRA_LEN: usize = 1024 * 1024; // 1 MiB

/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

