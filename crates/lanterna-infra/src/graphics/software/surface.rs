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

use super::{DeviceEvent, DeviceShared, SoftwareGraphics};
use lanterna_core::{Graphics, PixelBuffer, PixelRect, Surface, SurfaceMode};
use std::sync::Arc;

/// A CPU-backed surface created by a [`SoftwareDevice`](super::SoftwareDevice).
///
/// Onscreen surfaces "present" by publishing a copy of their pixels to the
/// device, where tests can inspect the last presented frame.
#[derive(Debug)]
pub struct SoftwareSurface {
    id: u64,
    mode: SurfaceMode,
    shared: Arc<DeviceShared>,
    graphics: SoftwareGraphics,
    locked: bool,
    lost: bool,
    disposed: bool,
}

impl SoftwareSurface {
    pub(crate) fn new(
        id: u64,
        width: u32,
        height: u32,
        mode: SurfaceMode,
        shared: Arc<DeviceShared>,
    ) -> Self {
        Self {
            id,
            mode,
            graphics: SoftwareGraphics::new(id, shared.clone(), width, height),
            shared,
            locked: false,
            lost: false,
            disposed: false,
        }
    }

    /// Device-wide identifier of this surface.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The rendered pixels.
    pub fn pixels(&self) -> &PixelBuffer {
        self.graphics.pixels()
    }

    fn mark_lost(&mut self, step: &str) {
        log::warn!("SoftwareSurface[{}]: {step} failed, backing memory lost", self.id);
        self.lost = true;
    }
}

impl Surface for SoftwareSurface {
    fn width(&self) -> u32 {
        self.graphics.width()
    }

    fn height(&self) -> u32 {
        self.graphics.height()
    }

    fn mode(&self) -> SurfaceMode {
        self.mode
    }

    fn lock(&mut self) -> bool {
        assert!(!self.disposed, "surface {} locked after dispose", self.id);
        assert!(!self.locked, "surface {} locked twice", self.id);
        self.locked = true;
        self.shared.record(DeviceEvent::Locked { id: self.id });
        if self.shared.faults.take_lock_loss() {
            self.mark_lost("lock");
        }
        self.graphics.reset_state();
        self.lost
    }

    fn unlock(&mut self) {
        assert!(self.locked, "surface {} unlocked while not locked", self.id);
        self.locked = false;
        self.shared.record(DeviceEvent::Unlocked { id: self.id });
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn is_lost(&self) -> bool {
        self.lost
    }

    fn graphics(&mut self) -> Option<&mut dyn Graphics> {
        if self.locked && !self.lost && !self.disposed {
            Some(&mut self.graphics)
        } else {
            None
        }
    }

    fn prepare(&mut self, dirty: Option<PixelRect>) -> bool {
        self.shared.record(DeviceEvent::Prepared { id: self.id, dirty });
        if self.lost {
            return false;
        }
        if self.shared.faults.take_prepare_failure() {
            self.mark_lost("prepare");
            return false;
        }
        true
    }

    fn present(&mut self) -> bool {
        if self.lost {
            return false;
        }
        if self.mode == SurfaceMode::Offscreen {
            return true;
        }
        if self.shared.faults.take_present_failure() {
            self.mark_lost("present");
            return false;
        }
        self.shared.record(DeviceEvent::Presented { id: self.id });
        self.shared.store_presented(self.graphics.pixels().clone());
        true
    }

    fn read_pixels(&mut self, buffer: &mut PixelBuffer) -> bool {
        if self.lost {
            return false;
        }
        if self.shared.faults.take_readback_failure() {
            self.mark_lost("readback");
            return false;
        }
        let source = self.graphics.pixels();
        buffer.resize(source.width(), source.height());
        buffer.pixels_mut().copy_from_slice(source.pixels());
        self.shared.record(DeviceEvent::ReadBack { id: self.id });
        true
    }

    fn dispose(&mut self) {
        if self.disposed {
            log::warn!("SoftwareSurface[{}]: disposed more than once", self.id);
        }
        self.disposed = true;
        self.locked = false;
        self.shared.record(DeviceEvent::SurfaceDisposed { id: self.id });
    }
}

impl Drop for SoftwareSurface {
    fn drop(&mut self) {
        if !self.disposed {
            log::debug!("SoftwareSurface[{}]: dropped without dispose", self.id);
        }
    }
}
