//! telemetry/counters.rs
//! Mutable counters used while a stream is processed.
//!
//! Collects chunk counts and byte counts during encrypt/decrypt and is
//! turned into an immutable `TelemetrySnapshot` when the stream ends.

use serde::Serialize;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TelemetryCounters {
    pub chunks_data: u64,
    pub chunks_extra: u64,
    pub chunks_terminator: u64,
    pub bytes_plaintext: u64,
    pub bytes_extra: u64,
    pub bytes_ciphertext: u64,
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record the stream header as overhead.
    pub fn add_header(&mut self, header_len: usize) {
        self.bytes_overhead += header_len as u64;
    }

    /// Record one data chunk.
    ///
    /// - `pt_len`: plaintext bytes carried by the chunk
    /// - `ct_len`: sealed payload length (ciphertext + tag)
    /// - `header_len`: encoded chunk header length
    pub fn add_data(&mut self, pt_len: usize, ct_len: usize, header_len: usize) {
        self.chunks_data += 1;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += ct_len as u64;
        self.bytes_overhead += header_len as u64;
    }

    /// Record one extra metadata chunk. Same arguments as [`Self::add_data`].
    pub fn add_extra(&mut self, extra_len: usize, ct_len: usize, header_len: usize) {
        self.chunks_extra += 1;
        self.bytes_extra += extra_len as u64;
        self.bytes_ciphertext += ct_len as u64;
        self.bytes_overhead += header_len as u64;
    }

    pub fn add_terminator(&mut self, header_len: usize) {
        self.chunks_terminator += 1;
        self.bytes_overhead += header_len as u64;
    }

    /// Total bytes on the wire: header, chunk headers and sealed payloads.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_ciphertext + self.bytes_overhead
    }
}
