//! chunkseal-core
//!
//! Pure Rust streaming authenticated-encryption codec.
//! Synchronous, single-threaded, no async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Wire format and crypto
pub mod headers;
pub mod framing;
pub mod crypto;
pub mod telemetry;

// Engines
pub mod stream;

pub use crate::stream::{
    decrypt, decrypt_bytes, decrypt_stream, encrypt, encrypt_bytes, encrypt_stream,
    CodecConfig, DecryptOutcome, Decryptor, Encryptor, InputSource, OutputSink,
};
pub use crate::crypto::Scheme;
pub use crate::telemetry::TelemetrySnapshot;
pub use crate::types::StreamError;
