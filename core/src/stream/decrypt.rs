//! src/stream/decrypt.rs
//!
//! Chunk decryption engine.
//!
//! Walks the container as a small state machine:
//!
//! ```text
//! ExpectHeader --stream header ok--> ExpectChunk --terminator--> Done
//!                                      |   ^
//!                                      +---+ extra / data chunk
//! ```
//!
//! The envelope header names no chunk cipher, so the session is resolved
//! from the scheme of the first sealed chunk. Later chunks that name another
//! scheme re-resolve it.
//!
//! Data plaintext is written to the sink as soon as its chunk
//! authenticates, so a failure part-way leaves the already verified prefix
//! in the sink. Callers that need all-or-nothing output must buffer or
//! delete it on error.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::framing::{read_chunk_header, ChunkKind};
use crate::headers::{read_stream_header, HEADER_LEN};
use crate::stream::config::CodecConfig;
use crate::stream::io::read_exact_or_truncated;
use crate::stream::session::CipherSession;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Result of a successful decryption.
#[derive(Debug)]
pub struct DecryptOutcome {
    /// Extra metadata stored by the encryptor; empty when none was stored.
    pub extra: Vec<u8>,
    pub telemetry: TelemetrySnapshot,
}

pub struct Decryptor<'k> {
    secret_key: &'k str,
    config: CodecConfig,
}

impl<'k> Decryptor<'k> {
    pub fn new(secret_key: &'k str, config: CodecConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self { secret_key, config })
    }

    /// Decrypt the container in `source`, writing plaintext to `sink`.
    ///
    /// Bytes after the terminator are never read.
    pub fn decrypt<R: Read, W: Write>(
        &self,
        source: &mut R,
        sink: &mut W,
    ) -> Result<DecryptOutcome, StreamError> {
        let max_ciphertext_len = self.config.max_ciphertext_len();

        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        // --- ExpectHeader ---
        timer.time(Stage::Read, || read_stream_header(source))?;
        counters.add_header(HEADER_LEN);

        let mut session: Option<CipherSession<'k>> = None;

        let mut buf: Vec<u8> = Vec::with_capacity(self.config.scratch_capacity());
        let mut extra: Vec<u8> = Vec::new();
        let mut seen_data = false;

        // --- ExpectChunk, until the terminator moves us to Done ---
        loop {
            let header = timer.time(Stage::Read, || read_chunk_header(source, max_ciphertext_len))?;
            let header_len = header.encoded_len();
            let kind = header.kind()?;

            match kind {
                ChunkKind::Terminator => {
                    counters.add_terminator(header_len);
                    debug!(kind = kind.as_str(), "chunk read");
                    break;
                }
                ChunkKind::Extra if seen_data => return Err(StreamError::ExtraAfterData),
                ChunkKind::Extra | ChunkKind::Data => {}
            }

            let scheme = header.scheme()?;
            let session = match session.as_mut() {
                Some(s) => {
                    s.ensure_scheme(scheme)?;
                    s
                }
                None => session.insert(CipherSession::new(self.secret_key, scheme)?),
            };

            let counter = session.counter();
            let ciphertext_len = header.ciphertext_len as usize;
            buf.clear();
            buf.resize(ciphertext_len, 0);
            timer.time(Stage::Read, || read_exact_or_truncated(source, &mut buf, "chunk payload"))?;
            timer.time(Stage::Open, || session.open_chunk(kind, header.nonce.as_bytes(), &mut buf))?;

            if kind == ChunkKind::Extra {
                if extra.len() + buf.len() > self.config.max_extra_len {
                    return Err(StreamError::OversizedExtra { max: self.config.max_extra_len });
                }
                extra.extend_from_slice(&buf);
                counters.add_extra(buf.len(), ciphertext_len, header_len);
            } else {
                seen_data = true;
                timer.time(Stage::Write, || sink.write_all(&buf))?;
                counters.add_data(buf.len(), ciphertext_len, header_len);
            }

            debug!(
                kind = kind.as_str(),
                counter,
                ciphertext_len,
                plaintext_len = buf.len(),
                "chunk read"
            );
        }

        timer.time(Stage::Write, || sink.flush())?;
        timer.finish();

        info!(
            data_chunks = counters.chunks_data,
            extra_chunks = counters.chunks_extra,
            plaintext_bytes = counters.bytes_plaintext,
            extra_bytes = extra.len(),
            "stream decrypted"
        );

        Ok(DecryptOutcome {
            extra,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}
