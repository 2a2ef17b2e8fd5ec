use std::time::{Duration, Instant};

use log::{info, log_enabled, trace, Level};

/// Accumulated stage timings for one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunProfiler {
    pub integration_time: Duration,
    pub constraint_time: Duration,
    pub force_time: Duration,
    pub total_time: Duration,

    pub steps: usize,
    pub particle_count: usize,
    pub entry_count: usize,
}

impl RunProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_time.as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        info!(
            "run profile: {} steps, {} particles, {} adjacency entries, {:.2} ms total",
            self.steps,
            self.particle_count,
            self.entry_count,
            self.total_time.as_secs_f64() * 1000.0
        );
        for (label, time) in [
            ("kick/drift", self.integration_time),
            ("constraints", self.constraint_time),
            ("contact forces", self.force_time),
        ] {
            info!(
                "  {label:<15} {:.2} ms ({:.1}%)",
                time.as_secs_f64() * 1000.0,
                (time.as_micros() as f64 / total_us) * 100.0
            );
        }
    }
}

/// Times one solver stage. On drop the elapsed time is added to its profiler
/// slot and, with trace logging enabled, reported under the stage name.
pub struct StageTimer<'a> {
    stage: &'static str,
    slot: &'a mut Duration,
    start: Instant,
}

impl<'a> StageTimer<'a> {
    pub fn new(stage: &'static str, slot: &'a mut Duration) -> Self {
        Self {
            stage,
            slot,
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.slot += elapsed;
        if log_enabled!(Level::Trace) {
            trace!("{} stage: {} ns", self.stage, elapsed.as_nanos());
        }
    }
}
