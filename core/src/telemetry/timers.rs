//! telemetry/timers.rs
//! Wall-clock accounting for the chunk loops.
//!
//! The encryptor charges `Read`, `Seal` and `Write`; the decryptor charges
//! `Read`, `Open` and `Write`. Each stage sums over every chunk.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Read,
    Write,
    Seal,
    Open,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Read, Stage::Write, Stage::Seal, Stage::Open];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Write => "write",
            Stage::Seal => "seal",
            Stage::Open => "open",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated time per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StageTimes {
    pub read: Duration,
    pub write: Duration,
    pub seal: Duration,
    pub open: Duration,
}

impl StageTimes {
    fn slot(&mut self, stage: Stage) -> &mut Duration {
        match stage {
            Stage::Read => &mut self.read,
            Stage::Write => &mut self.write,
            Stage::Seal => &mut self.seal,
            Stage::Open => &mut self.open,
        }
    }

    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.slot(stage) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Read => self.read,
            Stage::Write => self.write,
            Stage::Seal => self.seal,
            Stage::Open => self.open,
        }
    }

    pub fn total(&self) -> Duration {
        Stage::ALL.iter().map(|&s| self.get(s)).sum()
    }
}

/// Clock for one encrypt or decrypt call.
#[derive(Debug, Clone)]
pub struct TelemetryTimer {
    started: Instant,
    finished: Option<Instant>,
    stages: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            finished: None,
            stages: StageTimes::default(),
        }
    }

    /// Freeze `elapsed()` at the current instant.
    pub fn finish(&mut self) {
        self.finished.get_or_insert_with(Instant::now);
    }

    /// Run `f` and charge its wall time to `stage`.
    #[inline]
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.stages.add(stage, t0.elapsed());
        out
    }

    pub fn stages(&self) -> &StageTimes {
        &self.stages
    }

    pub fn elapsed(&self) -> Duration {
        self.finished
            .unwrap_or_else(Instant::now)
            .duration_since(self.started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_times_accumulate() {
        let mut t = StageTimes::default();
        t.add(Stage::Seal, Duration::from_micros(400));
        t.add(Stage::Seal, Duration::from_micros(20));
        t.add(Stage::Read, Duration::from_micros(100));
        assert_eq!(t.get(Stage::Seal), Duration::from_micros(420));
        assert_eq!(t.get(Stage::Open), Duration::ZERO);
        assert_eq!(t.total(), Duration::from_micros(520));
    }

    #[test]
    fn timed_closure_returns_its_value() {
        let mut timer = TelemetryTimer::new();
        let v = timer.time(Stage::Write, || 7);
        assert_eq!(v, 7);
        timer.finish();
        assert!(timer.stages().total() <= timer.elapsed());
    }

    #[test]
    fn finish_freezes_elapsed() {
        let mut timer = TelemetryTimer::new();
        timer.finish();
        let first = timer.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        timer.finish();
        assert_eq!(timer.elapsed(), first);
    }
}
