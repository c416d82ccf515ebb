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

//! Turns the registry's pending set into render jobs, once per pulse.

use crate::queue::{JobHandle, RenderQueue};
use crate::registry::PulseRegistry;
use lanterna_core::{SceneId, Stopwatch};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A scene as seen by the scheduler.
pub trait PulseTarget: Send + Sync + 'static {
    /// The registry key of the scene.
    fn scene_id(&self) -> SceneId;

    /// Freezes the scene's snapshot. Runs on the scene thread, under the render lock.
    ///
    /// ## Returns
    /// `false` if the scene cannot render any more (e.g. it was detached);
    /// no job is submitted for it.
    fn sync(&self) -> bool;

    /// Runs the scene's painter. Runs on the render thread.
    fn render(&self);
}

/// What a single pulse did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseReport {
    /// Sequence number of the pulse, starting at 1.
    pub pulse: u64,
    /// Scenes drained from the registry.
    pub drained: usize,
    /// Render jobs submitted.
    pub submitted: usize,
    /// Time spent in the sync steps.
    pub sync_time: Duration,
    /// Time spent waiting for the previous pulse's jobs.
    pub wait_time: Duration,
}

/// Drives pulses: drain, sync on the calling thread, then submit.
pub struct PulseScheduler<T: PulseTarget + ?Sized> {
    registry: Arc<PulseRegistry<T>>,
    queue: Arc<RenderQueue>,
    wait_for_render: bool,
    in_flight: Mutex<Vec<JobHandle>>,
    pulses: AtomicU64,
}

impl<T: PulseTarget + ?Sized> PulseScheduler<T> {
    /// Creates a scheduler over a registry and a render queue.
    pub fn new(registry: Arc<PulseRegistry<T>>, queue: Arc<RenderQueue>, wait_for_render: bool) -> Self {
        Self {
            registry,
            queue,
            wait_for_render,
            in_flight: Mutex::new(Vec::new()),
            pulses: AtomicU64::new(0),
        }
    }

    /// The registry this scheduler drains.
    pub fn registry(&self) -> &Arc<PulseRegistry<T>> {
        &self.registry
    }

    /// Runs one pulse. Must be called from the scene thread.
    pub fn pulse(&self) -> PulseReport {
        let pulse = self.pulses.fetch_add(1, Ordering::Relaxed) + 1;
        let mut report = PulseReport {
            pulse,
            ..PulseReport::default()
        };

        if self.wait_for_render {
            let watch = Stopwatch::new();
            self.wait_for_previous();
            report.wait_time = watch.elapsed();
        }

        let scenes = self.registry.drain();
        report.drained = scenes.len();
        if scenes.is_empty() {
            return report;
        }

        let watch = Stopwatch::new();
        let ready: Vec<Arc<T>> = scenes.into_iter().filter(|scene| scene.sync()).collect();
        report.sync_time = watch.elapsed();

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Without waiting, nothing else drops the handles of jobs that already ran.
        in_flight.retain(|handle| !handle.is_finished());
        for scene in ready {
            let id = scene.scene_id();
            match self.queue.submit(move || scene.render()) {
                Ok(handle) => {
                    in_flight.push(handle);
                    report.submitted += 1;
                }
                Err(e) => log::error!("PulseScheduler: cannot submit render job for {id}: {e}"),
            }
        }

        log::trace!(
            "PulseScheduler: pulse {} drained {} scene(s), submitted {} job(s)",
            pulse,
            report.drained,
            report.submitted
        );
        report
    }

    /// Blocks until every job submitted by earlier pulses has run.
    pub fn wait_for_previous(&self) {
        let handles = std::mem::take(
            &mut *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            handle.wait();
        }
    }

    /// Number of submitted jobs not known to have finished.
    pub fn in_flight_jobs(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if a scene is waiting for the next pulse.
    pub fn pulse_pending(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Number of pulses run so far.
    pub fn pulse_count(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}
