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

//! Process-wide paint counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts what the painters did. Shared by every painter of a toolkit.
#[derive(Debug, Default)]
pub struct PaintCounters {
    frames_painted: AtomicU64,
    full_redraws: AtomicU64,
    clipped_passes: AtomicU64,
    pulses_skipped: AtomicU64,
    device_faults: AtomicU64,
    surface_recreations: AtomicU64,
    uploads_dropped: AtomicU64,
}

/// A point-in-time copy of [`PaintCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintCountersSnapshot {
    /// Frames that reached the host.
    pub frames_painted: u64,
    /// Frames painted with one unclipped pass.
    pub full_redraws: u64,
    /// Clipped draw passes over all frames.
    pub clipped_passes: u64,
    /// Pulses skipped at validation.
    pub pulses_skipped: u64,
    /// Transient device faults (lost surface, failed present or readback).
    pub device_faults: u64,
    /// Surfaces created after the first one of a scene.
    pub surface_recreations: u64,
    /// Uploads replaced or rejected before the host took them.
    pub uploads_dropped: u64,
}

impl PaintCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame that reached the host.
    pub fn record_frame(&self, clipped_passes: usize) {
        self.frames_painted.fetch_add(1, Ordering::Relaxed);
        if clipped_passes == 0 {
            self.full_redraws.fetch_add(1, Ordering::Relaxed);
        } else {
            self.clipped_passes
                .fetch_add(clipped_passes as u64, Ordering::Relaxed);
        }
    }

    /// Records a pulse skipped at validation.
    pub fn record_skip(&self) {
        self.pulses_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a transient device fault.
    pub fn record_device_fault(&self) {
        self.device_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a surface recreation.
    pub fn record_surface_recreation(&self) {
        self.surface_recreations.fetch_add(1, Ordering::Relaxed);
    }

    /// Records dropped uploads.
    pub fn record_uploads_dropped(&self, count: u64) {
        self.uploads_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Copies the current values.
    pub fn snapshot(&self) -> PaintCountersSnapshot {
        PaintCountersSnapshot {
            frames_painted: self.frames_painted.load(Ordering::Relaxed),
            full_redraws: self.full_redraws.load(Ordering::Relaxed),
            clipped_passes: self.clipped_passes.load(Ordering::Relaxed),
            pulses_skipped: self.pulses_skipped.load(Ordering::Relaxed),
            device_faults: self.device_faults.load(Ordering::Relaxed),
            surface_recreations: self.surface_recreations.load(Ordering::Relaxed),
            uploads_dropped: self.uploads_dropped.load(Ordering::Relaxed),
        }
    }
}

impl PaintCountersSnapshot {
    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
