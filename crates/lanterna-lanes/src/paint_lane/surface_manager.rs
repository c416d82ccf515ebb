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

use lanterna_core::{GraphicsDevice, Surface, SurfaceDescriptor, SurfaceMode};
use std::sync::Arc;

/// Single owner of one scene's surface.
///
/// The surface is created lazily, recreated when the requested size changes
/// or the device reports its memory lost, and disposed exactly once. It is
/// only reachable through a [`SurfaceLease`], which keeps it locked for the
/// duration of a painter run.
#[derive(Debug)]
pub struct SurfaceManager {
    device: Arc<dyn GraphicsDevice>,
    mode: SurfaceMode,
    depth_buffer: bool,
    surface: Option<Box<dyn Surface>>,
    /// The current surface was disposed by a lease and only awaits dropping.
    disposed: bool,
    created: u64,
}

impl SurfaceManager {
    /// Creates a manager with no surface yet.
    pub fn new(device: Arc<dyn GraphicsDevice>, mode: SurfaceMode, depth_buffer: bool) -> Self {
        Self {
            device,
            mode,
            depth_buffer,
            surface: None,
            disposed: false,
            created: 0,
        }
    }

    /// The device surfaces are created on.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// Kind of surface this manager creates.
    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    /// Returns `true` if a usable surface is held.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some() && !self.disposed
    }

    /// Size of the held surface in device pixels.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
            .as_ref()
            .filter(|_| !self.disposed)
            .map(|s| (s.width(), s.height()))
    }

    /// Number of surfaces created so far.
    pub fn surfaces_created(&self) -> u64 {
        self.created
    }

    /// Locks a surface of exactly `width` x `height` device pixels.
    ///
    /// An existing surface of another size, or one whose backing memory was
    /// lost, is disposed and replaced first.
    ///
    /// ## Returns
    /// A lease on the locked surface, or `None` if the device could not
    /// allocate one. No surface is left locked on failure.
    pub fn acquire(&mut self, width: u32, height: u32) -> Option<SurfaceLease<'_>> {
        if self.disposed {
            self.surface = None;
            self.disposed = false;
        }
        if let Some((w, h)) = self.surface_size() {
            if (w, h) != (width, height) {
                log::debug!("SurfaceManager: resizing surface {w}x{h} -> {width}x{height}");
                self.dispose();
            }
        }

        let mut recreated = false;
        let mut retried = false;
        loop {
            if self.surface.is_none() {
                self.surface = Some(self.create(width, height)?);
                recreated = true;
            }
            let surface = self.surface.as_mut()?;
            if !surface.lock() {
                break;
            }
            surface.unlock();
            log::warn!("SurfaceManager: surface memory lost, recreating {width}x{height}");
            self.dispose();
            if retried {
                return None;
            }
            retried = true;
        }

        let replaced = recreated && self.created > 1;
        let Self {
            surface, disposed, ..
        } = self;
        let surface = surface.as_mut()?;
        Some(SurfaceLease {
            surface,
            disposed,
            recreated,
            replaced,
            invalidated: false,
        })
    }

    /// Disposes the held surface, if any.
    pub fn dispose(&mut self) {
        let already_disposed = std::mem::take(&mut self.disposed);
        if let Some(mut surface) = self.surface.take() {
            if already_disposed {
                return;
            }
            if surface.is_locked() {
                surface.unlock();
            }
            surface.dispose();
            log::debug!(
                "SurfaceManager: disposed {}x{} surface",
                surface.width(),
                surface.height()
            );
        }
    }

    fn create(&mut self, width: u32, height: u32) -> Option<Box<dyn Surface>> {
        let descriptor = SurfaceDescriptor {
            width,
            height,
            mode: self.mode,
            depth_buffer: self.depth_buffer,
        };
        let surface = self.device.create_surface(&descriptor)?;
        self.created += 1;
        log::debug!(
            "SurfaceManager: created {width}x{height} {:?} surface on '{}'",
            self.mode,
            self.device.name()
        );
        Some(surface)
    }
}

impl Drop for SurfaceManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// A locked surface, unlocked again when the lease is dropped.
///
/// If the lease was [`invalidate`](Self::invalidate)d, the surface is also
/// disposed on drop and the next [`SurfaceManager::acquire`] creates a new one.
pub struct SurfaceLease<'a> {
    surface: &'a mut Box<dyn Surface>,
    disposed: &'a mut bool,
    recreated: bool,
    replaced: bool,
    invalidated: bool,
}

impl SurfaceLease<'_> {
    /// The locked surface.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut **self.surface
    }

    /// Returns `true` if the surface was created by this acquisition and
    /// therefore holds no previous frame.
    pub fn was_recreated(&self) -> bool {
        self.recreated
    }

    /// Returns `true` if this acquisition replaced an earlier surface.
    pub fn replaced_previous(&self) -> bool {
        self.replaced
    }

    /// Marks the surface stale: it is disposed when the lease ends.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }
}

impl Drop for SurfaceLease<'_> {
    fn drop(&mut self) {
        if self.surface.is_locked() {
            self.surface.unlock();
        }
        if self.invalidated {
            self.surface.dispose();
            *self.disposed = true;
            log::debug!("SurfaceLease: stale surface disposed");
        }
    }
}
