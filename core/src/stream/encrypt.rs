//! src/stream/encrypt.rs
//!
//! Chunk encryption engine.
//!
//! Output layout:
//!
//! ```text
//! [ stream header ]
//! [ extra chunk ]*      optional metadata, before any data
//! [ data chunk ]*       one per `max_chunk_size` plaintext bytes
//! [ terminator chunk ]  no payload
//! ```
//!
//! One scratch buffer of `max_chunk_size + TAG_LEN` bytes is reserved up
//! front and sealed in place for every chunk. On error the sink holds a
//! partial container that the caller must discard.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::crypto::random_nonce_12;
use crate::framing::{write_chunk_header, ChunkHeader, ChunkKind};
use crate::headers::{write_stream_header, StreamHeader, HEADER_LEN};
use crate::stream::config::CodecConfig;
use crate::stream::io::read_full;
use crate::stream::session::CipherSession;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

pub struct Encryptor<'k> {
    secret_key: &'k str,
    config: CodecConfig,
}

impl<'k> Encryptor<'k> {
    pub fn new(secret_key: &'k str, config: CodecConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self { secret_key, config })
    }

    /// Encrypt everything `source` yields into `sink`.
    ///
    /// `extra` is stored ahead of the data and returned by decryption; an
    /// empty slice is treated as absent.
    pub fn encrypt<R: Read, W: Write>(
        &self,
        source: &mut R,
        sink: &mut W,
        extra: Option<&[u8]>,
    ) -> Result<TelemetrySnapshot, StreamError> {
        let chunk_size = self.config.max_chunk_size;
        let extra = extra.filter(|m| !m.is_empty());
        if let Some(m) = extra {
            if m.len() > self.config.max_extra_len {
                return Err(StreamError::OversizedExtra { max: self.config.max_extra_len });
            }
        }

        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();
        let mut session = CipherSession::new(self.secret_key, self.config.scheme)?;

        write_stream_header(sink, &StreamHeader::default())?;
        counters.add_header(HEADER_LEN);

        let mut buf: Vec<u8> = Vec::with_capacity(self.config.scratch_capacity());

        // --- extra metadata ---
        if let Some(m) = extra {
            for part in m.chunks(chunk_size) {
                buf.clear();
                buf.extend_from_slice(part);
                let header_len = seal_and_write(&mut session, ChunkKind::Extra, &mut buf, sink, &mut timer)?;
                counters.add_extra(part.len(), buf.len(), header_len);
            }
        }

        // --- data ---
        loop {
            buf.clear();
            buf.resize(chunk_size, 0);
            let n = timer.time(Stage::Read, || read_full(source, &mut buf))?;
            if n == 0 {
                break;
            }
            buf.truncate(n);

            let header_len = seal_and_write(&mut session, ChunkKind::Data, &mut buf, sink, &mut timer)?;
            counters.add_data(n, buf.len(), header_len);

            // read_full only comes up short at EOF
            if n < chunk_size {
                break;
            }
        }

        // --- terminator ---
        let nonce = random_nonce_12()?;
        let terminator = ChunkHeader::terminator(session.scheme(), &nonce)?;
        let header_len = write_chunk_header(sink, &terminator)?;
        counters.add_terminator(header_len);
        debug!(kind = ChunkKind::Terminator.as_str(), "chunk written");

        timer.time(Stage::Write, || sink.flush())?;
        timer.finish();

        info!(
            scheme = %session.scheme(),
            data_chunks = counters.chunks_data,
            extra_chunks = counters.chunks_extra,
            plaintext_bytes = counters.bytes_plaintext,
            wire_bytes = counters.wire_bytes(),
            "stream encrypted"
        );

        Ok(TelemetrySnapshot::from(&counters, &timer))
    }
}

/// Seal `buf` as one chunk of `kind` and write header plus payload.
///
/// Returns the encoded header length; `buf` holds the sealed payload after.
fn seal_and_write<W: Write>(
    session: &mut CipherSession<'_>,
    kind: ChunkKind,
    buf: &mut Vec<u8>,
    sink: &mut W,
    timer: &mut TelemetryTimer,
) -> Result<usize, StreamError> {
    let counter = session.counter();
    let plaintext_len = buf.len();

    let nonce = timer.time(Stage::Seal, || session.seal_chunk(kind, buf))?;
    let header = ChunkHeader::new(kind, session.scheme(), &nonce, buf.len() as u64)?;

    let header_len = timer.time(Stage::Write, || -> Result<usize, StreamError> {
        let n = write_chunk_header(sink, &header)?;
        sink.write_all(&buf[..])?;
        Ok(n)
    })?;

    debug!(
        kind = kind.as_str(),
        counter,
        plaintext_len,
        ciphertext_len = buf.len(),
        "chunk written"
    );
    Ok(header_len)
}
