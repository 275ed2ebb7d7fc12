//! Wire framing for chunks.
//!
//! Responsibilities:
//! - Define chunk headers and kinds
//! - Encode headers into a canonical byte layout
//! - Decode headers with strict validation
//!
//! Non-responsibilities:
//! - Cryptography
//! - Payload I/O

pub mod types;
pub mod varint;
pub mod encode;
pub mod decode;

pub use types::{
    ChunkHeader,
    ChunkKind,
    ChunkError,
    Nonce,
};
pub use encode::{encode_chunk_header, write_chunk_header};
pub use decode::{decode_chunk_header, read_chunk_header};
