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

//! A CPU implementation of the graphics contracts.
//!
//! Every surface operation is appended to a shared event log, so tests can
//! assert the exact order of create, lock, clip, draw, present and dispose
//! calls. [`FaultInjection`] makes any of those steps fail on demand.

mod context;
mod device;
mod surface;

pub use self::context::SoftwareGraphics;
pub use self::device::SoftwareDevice;
pub use self::surface::SoftwareSurface;

use lanterna_core::{PixelBuffer, PixelRect, SurfaceMode};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// One recorded device operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A surface was allocated.
    SurfaceCreated {
        /// Surface identifier.
        id: u64,
        /// Width in device pixels.
        width: u32,
        /// Height in device pixels.
        height: u32,
        /// Target kind.
        mode: SurfaceMode,
    },
    /// Surface creation was refused.
    SurfaceCreationFailed {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A surface was disposed.
    SurfaceDisposed {
        /// Surface identifier.
        id: u64,
    },
    /// A surface was locked.
    Locked {
        /// Surface identifier.
        id: u64,
    },
    /// A surface was unlocked.
    Unlocked {
        /// Surface identifier.
        id: u64,
    },
    /// The clip rectangle changed.
    ClipSet {
        /// Surface identifier.
        id: u64,
        /// The new clip, `None` for unclipped.
        clip: Option<PixelRect>,
    },
    /// The clip area was cleared.
    Cleared {
        /// Surface identifier.
        id: u64,
    },
    /// A rectangle was filled.
    Filled {
        /// Surface identifier.
        id: u64,
    },
    /// Pending drawing was flushed.
    Prepared {
        /// Surface identifier.
        id: u64,
        /// The dirty area passed to `prepare`.
        dirty: Option<PixelRect>,
    },
    /// The surface was presented.
    Presented {
        /// Surface identifier.
        id: u64,
    },
    /// Pixels were read back.
    ReadBack {
        /// Surface identifier.
        id: u64,
    },
}

impl DeviceEvent {
    /// The surface the event concerns, if any.
    pub fn surface_id(&self) -> Option<u64> {
        match self {
            DeviceEvent::SurfaceCreationFailed { .. } => None,
            DeviceEvent::SurfaceCreated { id, .. }
            | DeviceEvent::SurfaceDisposed { id }
            | DeviceEvent::Locked { id }
            | DeviceEvent::Unlocked { id }
            | DeviceEvent::ClipSet { id, .. }
            | DeviceEvent::Cleared { id }
            | DeviceEvent::Filled { id }
            | DeviceEvent::Prepared { id, .. }
            | DeviceEvent::Presented { id }
            | DeviceEvent::ReadBack { id } => Some(*id),
        }
    }
}

/// Switches that make the next device operations fail.
///
/// Counters are consumed one per failing call, so `fail_next_presents(2)`
/// fails exactly the next two presents.
#[derive(Debug, Default)]
pub struct FaultInjection {
    device_lost: AtomicBool,
    surface_failures: AtomicU32,
    lock_losses: AtomicU32,
    prepare_failures: AtomicU32,
    present_failures: AtomicU32,
    readback_failures: AtomicU32,
}

impl FaultInjection {
    /// Makes the device report itself not ready until cleared.
    pub fn set_device_lost(&self, lost: bool) {
        self.device_lost.store(lost, Ordering::SeqCst);
    }

    /// Refuses the next `count` surface creations.
    pub fn fail_next_surfaces(&self, count: u32) {
        self.surface_failures.store(count, Ordering::SeqCst);
    }

    /// Reports the backing memory lost on the next `count` locks.
    pub fn lose_next_locks(&self, count: u32) {
        self.lock_losses.store(count, Ordering::SeqCst);
    }

    /// Fails the next `count` prepares.
    pub fn fail_next_prepares(&self, count: u32) {
        self.prepare_failures.store(count, Ordering::SeqCst);
    }

    /// Fails the next `count` presents.
    pub fn fail_next_presents(&self, count: u32) {
        self.present_failures.store(count, Ordering::SeqCst);
    }

    /// Fails the next `count` pixel readbacks.
    pub fn fail_next_readbacks(&self, count: u32) {
        self.readback_failures.store(count, Ordering::SeqCst);
    }

    pub(crate) fn is_device_lost(&self) -> bool {
        self.device_lost.load(Ordering::SeqCst)
    }

    pub(crate) fn take_surface_failure(&self) -> bool {
        consume(&self.surface_failures)
    }

    pub(crate) fn take_lock_loss(&self) -> bool {
        consume(&self.lock_losses)
    }

    pub(crate) fn take_prepare_failure(&self) -> bool {
        consume(&self.prepare_failures)
    }

    pub(crate) fn take_present_failure(&self) -> bool {
        consume(&self.present_failures)
    }

    pub(crate) fn take_readback_failure(&self) -> bool {
        consume(&self.readback_failures)
    }
}

fn consume(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// State shared by a device and every surface it created.
#[derive(Debug, Default)]
pub(crate) struct DeviceShared {
    pub(crate) faults: FaultInjection,
    events: Mutex<Vec<DeviceEvent>>,
    next_surface_id: AtomicU64,
    last_presented: Mutex<Option<PixelBuffer>>,
}

impl DeviceShared {
    pub(crate) fn record(&self, event: DeviceEvent) {
        log::trace!("SoftwareDevice: {event:?}");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub(crate) fn allocate_surface_id(&self) -> u64 {
        self.next_surface_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn events(&self) -> Vec<DeviceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn clear_events(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) fn store_presented(&self, frame: PixelBuffer) {
        *self
            .last_presented
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    pub(crate) fn last_presented(&self) -> Option<PixelBuffer> {
        self.last_presented
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_counters_are_consumed_one_per_call() {
        let faults = FaultInjection::default();
        faults.fail_next_presents(2);
        assert!(faults.take_present_failure());
        assert!(faults.take_present_failure());
        assert!(!faults.take_present_failure());
        assert!(!faults.take_prepare_failure());
    }
}
