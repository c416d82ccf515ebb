// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-pulse phase timings.

use lanterna_core::SceneId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A measured step of a pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePhase {
    /// Waiting for the previous pulse's render jobs.
    Wait,
    /// Freezing scene snapshots on the scene thread.
    Sync,
    /// Running one scene's painter on the render thread.
    Paint(SceneId),
}

/// Timings gathered since the previous summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseSummary {
    /// Sequence number of the summarized pulse.
    pub pulse: u64,
    /// Time spent waiting for render jobs.
    pub wait: Duration,
    /// Time spent in sync steps.
    pub sync: Duration,
    /// Painter run times, in completion order.
    pub paints: Vec<(SceneId, Duration)>,
}

impl PulseSummary {
    /// Sum of all painter run times.
    pub fn total_paint(&self) -> Duration {
        self.paints.iter().map(|(_, d)| *d).sum()
    }
}

/// Collects phase timings from both threads and logs one line per pulse.
///
/// Paint timings arrive asynchronously from the render thread; each summary
/// reports the ones that completed since the previous summary.
#[derive(Debug, Default)]
pub struct PulseLogger {
    current: Mutex<PulseSummary>,
    pulses: AtomicU64,
}

impl PulseLogger {
    /// Creates an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to `phase`.
    pub fn record(&self, phase: PulsePhase, elapsed: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match phase {
            PulsePhase::Wait => current.wait += elapsed,
            PulsePhase::Sync => current.sync += elapsed,
            PulsePhase::Paint(scene) => current.paints.push((scene, elapsed)),
        }
    }

    /// Closes the current pulse, logs its summary at `debug` and returns it.
    pub fn finish_pulse(&self) -> PulseSummary {
        let pulse = self.pulses.fetch_add(1, Ordering::Relaxed) + 1;
        let mut summary = std::mem::take(
            &mut *self.current.lock().unwrap_or_else(PoisonError::into_inner),
        );
        summary.pulse = pulse;
        log::debug!(
            "Pulse {}: wait {:.3} ms, sync {:.3} ms, {} paint(s) totalling {:.3} ms",
            pulse,
            summary.wait.as_secs_f64() * 1000.0,
            summary.sync.as_secs_f64() * 1000.0,
            summary.paints.len(),
            summary.total_paint().as_secs_f64() * 1000.0
        );
        summary
    }

    /// Number of summaries emitted so far.
    pub fn pulse_count(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_collects_and_resets() {
        let logger = PulseLogger::new();
        let scene = SceneId::next();
        logger.record(PulsePhase::Sync, Duration::from_millis(2));
        logger.record(PulsePhase::Sync, Duration::from_millis(1));
        logger.record(PulsePhase::Paint(scene), Duration::from_millis(4));
        logger.record(PulsePhase::Paint(scene), Duration::from_millis(6));

        let summary = logger.finish_pulse();
        assert_eq!(summary.pulse, 1);
        assert_eq!(summary.sync, Duration::from_millis(3));
        assert_eq!(summary.total_paint(), Duration::from_millis(10));

        let next = logger.finish_pulse();
        assert_eq!(next.pulse, 2);
        assert!(next.paints.is_empty());
        assert_eq!(logger.pulse_count(), 2);
    }
}
