//! src/telemetry/snapshot.rs
//!
//! Immutable summary of one finished stream.

use std::time::Duration;

use serde::Serialize;

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub chunks_data: u64,
    pub chunks_extra: u64,
    pub chunks_terminator: u64,
    pub bytes_plaintext: u64,
    pub bytes_extra: u64,
    pub bytes_ciphertext: u64,
    pub bytes_overhead: u64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Bytes collected by an `OutputSink::Memory`.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks_data: counters.chunks_data,
            chunks_extra: counters.chunks_extra,
            chunks_terminator: counters.chunks_terminator,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_extra: counters.bytes_extra,
            bytes_ciphertext: counters.bytes_ciphertext,
            bytes_overhead: counters.bytes_overhead,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
            stage_times: *timer.stages(),
            output: None,
        }
    }

    pub fn attach_output(&mut self, output: Vec<u8>) {
        self.output = Some(output);
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Bytes of container produced (encrypt) or consumed (decrypt).
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_ciphertext + self.bytes_overhead
    }

    /// Internal consistency:
    /// - every plaintext and extra byte is covered by ciphertext
    /// - stage times fit inside the elapsed time
    pub fn sanity_check(&self) -> bool {
        self.bytes_ciphertext >= self.bytes_plaintext + self.bytes_extra
            && self.total_stage_time() <= self.elapsed
    }
}
