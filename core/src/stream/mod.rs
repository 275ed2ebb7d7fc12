//! Streaming encrypt/decrypt engines and their public entry points.

pub mod config;
pub mod core;
pub mod decrypt;
pub mod encrypt;
pub mod io;
pub mod session;

pub use self::config::CodecConfig;
pub use self::core::{decrypt, decrypt_bytes, decrypt_stream, encrypt, encrypt_bytes, encrypt_stream};
pub use self::decrypt::{DecryptOutcome, Decryptor};
pub use self::encrypt::Encryptor;
pub use self::io::{InputSource, OutputSink};
pub use self::session::CipherSession;
