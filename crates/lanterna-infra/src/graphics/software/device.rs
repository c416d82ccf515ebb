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

use super::{DeviceEvent, DeviceShared, FaultInjection, SoftwareSurface};
use lanterna_core::{GraphicsDevice, PixelBuffer, Surface, SurfaceDescriptor};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A graphics device that rasterizes on the CPU.
///
/// Every surface operation is recorded as a [`DeviceEvent`], and the
/// [`FaultInjection`] switches simulate resource exhaustion and device loss.
#[derive(Debug)]
pub struct SoftwareDevice {
    name: String,
    shared: Arc<DeviceShared>,
    max_surface_pixels: AtomicU64,
}

impl SoftwareDevice {
    /// Creates a ready device with no surface size limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(DeviceShared::default()),
            max_surface_pixels: AtomicU64::new(0),
        }
    }

    /// Fault injection switches.
    pub fn faults(&self) -> &FaultInjection {
        &self.shared.faults
    }

    /// Refuses surfaces larger than `pixels` (width × height). Zero lifts the limit.
    pub fn set_max_surface_pixels(&self, pixels: u64) {
        self.max_surface_pixels.store(pixels, Ordering::Relaxed);
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<DeviceEvent> {
        self.shared.events()
    }

    /// Forgets the recorded events.
    pub fn clear_events(&self) {
        self.shared.clear_events();
    }

    /// Number of recorded events matching `predicate`.
    pub fn count_events(&self, predicate: impl Fn(&DeviceEvent) -> bool) -> usize {
        self.shared.events().iter().filter(|e| predicate(e)).count()
    }

    /// Number of surfaces created so far.
    pub fn surfaces_created(&self) -> usize {
        self.count_events(|e| matches!(e, DeviceEvent::SurfaceCreated { .. }))
    }

    /// Number of `dispose` calls so far.
    pub fn surfaces_disposed(&self) -> usize {
        self.count_events(|e| matches!(e, DeviceEvent::SurfaceDisposed { .. }))
    }

    /// Copy of the last frame presented by an onscreen surface.
    pub fn last_presented(&self) -> Option<PixelBuffer> {
        self.shared.last_presented()
    }

    fn refuse(&self, descriptor: &SurfaceDescriptor, reason: &str) -> Option<Box<dyn Surface>> {
        log::warn!(
            "SoftwareDevice '{}': cannot create {}x{} surface ({reason})",
            self.name,
            descriptor.width,
            descriptor.height
        );
        self.shared.record(DeviceEvent::SurfaceCreationFailed {
            width: descriptor.width,
            height: descriptor.height,
        });
        None
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new("software")
    }
}

impl GraphicsDevice for SoftwareDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_device_ready(&self) -> bool {
        !self.shared.faults.is_device_lost()
    }

    fn create_surface(&self, descriptor: &SurfaceDescriptor) -> Option<Box<dyn Surface>> {
        if self.shared.faults.is_device_lost() {
            return self.refuse(descriptor, "device lost");
        }
        if self.shared.faults.take_surface_failure() {
            return self.refuse(descriptor, "out of memory");
        }
        if descriptor.width == 0 || descriptor.height == 0 {
            return self.refuse(descriptor, "empty size");
        }
        let limit = self.max_surface_pixels.load(Ordering::Relaxed);
        let requested = u64::from(descriptor.width) * u64::from(descriptor.height);
        if limit > 0 && requested > limit {
            return self.refuse(descriptor, "exceeds size limit");
        }

        let id = self.shared.allocate_surface_id();
        self.shared.record(DeviceEvent::SurfaceCreated {
            id,
            width: descriptor.width,
            height: descriptor.height,
            mode: descriptor.mode,
        });
        log::debug!(
            "SoftwareDevice '{}': created surface {id} ({}x{}, {:?})",
            self.name,
            descriptor.width,
            descriptor.height,
            descriptor.mode
        );
        Some(Box::new(SoftwareSurface::new(
            id,
            descriptor.width,
            descriptor.height,
            descriptor.mode,
            self.shared.clone(),
        )))
    }
}
