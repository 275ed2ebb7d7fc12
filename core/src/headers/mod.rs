//! headers/mod.rs
//! Public module export for the stream header.
//!
//! Notes:
//! - Fixed-size header (14 bytes) enables deterministic IO.
//! - Magic, scheme name and version are checked on read, so a foreign or
//!   newer container is rejected before any chunk is parsed.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
