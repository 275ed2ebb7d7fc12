//! src/stream/core.rs
//!
//! Stable public API over the encrypt and decrypt engines.

use std::io::{Read, Write};

use crate::stream::config::CodecConfig;
use crate::stream::decrypt::{DecryptOutcome, Decryptor};
use crate::stream::encrypt::Encryptor;
use crate::stream::io::{open_input, open_output, take_captured, InputSource, OutputSink};
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

/// Encrypt `source` into `sink` with the default config.
pub fn encrypt<R: Read, W: Write>(
    mut source: R,
    mut sink: W,
    secret_key: &str,
    extra: Option<&[u8]>,
) -> Result<(), StreamError> {
    Encryptor::new(secret_key, CodecConfig::default())?.encrypt(&mut source, &mut sink, extra)?;
    Ok(())
}

/// Decrypt `source` into `sink` with the default config; returns the extra
/// metadata (empty when none was stored).
pub fn decrypt<R: Read, W: Write>(
    mut source: R,
    mut sink: W,
    secret_key: &str,
) -> Result<Vec<u8>, StreamError> {
    let outcome = Decryptor::new(secret_key, CodecConfig::default())?.decrypt(&mut source, &mut sink)?;
    Ok(outcome.extra)
}

/// 🔐 Encrypt stream
///
/// A memory sink hands its bytes back in `TelemetrySnapshot::output`.
pub fn encrypt_stream(
    input: InputSource,
    output: OutputSink,
    secret_key: &str,
    extra: Option<&[u8]>,
    config: &CodecConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let encryptor = Encryptor::new(secret_key, *config)?;

    let mut reader = open_input(input)?;
    let (mut writer, captured) = open_output(output)?;

    let mut snapshot = encryptor.encrypt(&mut reader, &mut writer, extra)?;
    drop(writer);

    if let Some(buf) = captured {
        snapshot.attach_output(take_captured(&buf));
    }
    Ok(snapshot)
}

/// 🔓 Decrypt stream
///
/// A memory sink hands its bytes back in `outcome.telemetry.output`.
pub fn decrypt_stream(
    input: InputSource,
    output: OutputSink,
    secret_key: &str,
    config: &CodecConfig,
) -> Result<DecryptOutcome, StreamError> {
    let decryptor = Decryptor::new(secret_key, *config)?;

    let mut reader = open_input(input)?;
    let (mut writer, captured) = open_output(output)?;

    let mut outcome = decryptor.decrypt(&mut reader, &mut writer)?;
    drop(writer);

    if let Some(buf) = captured {
        outcome.telemetry.attach_output(take_captured(&buf));
    }
    Ok(outcome)
}

/// Encrypt an in-memory plaintext.
pub fn encrypt_bytes(
    plaintext: &[u8],
    secret_key: &str,
    extra: Option<&[u8]>,
) -> Result<Vec<u8>, StreamError> {
    let mut out = Vec::new();
    encrypt(plaintext, &mut out, secret_key, extra)?;
    Ok(out)
}

/// Decrypt an in-memory container; returns `(plaintext, extra)`.
pub fn decrypt_bytes(ciphertext: &[u8], secret_key: &str) -> Result<(Vec<u8>, Vec<u8>), StreamError> {
    let mut plaintext = Vec::new();
    let extra = decrypt(ciphertext, &mut plaintext, secret_key)?;
    Ok((plaintext, extra))
}
