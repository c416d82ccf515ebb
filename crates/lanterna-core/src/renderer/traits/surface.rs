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

use super::graphics::Graphics;
use crate::math::PixelRect;
use crate::platform::PixelBuffer;
use std::fmt::Debug;

/// Where a surface's pixels end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceMode {
    /// A swap chain presented to a native window.
    Onscreen,
    /// A texture whose pixels are read back for a host to composite.
    Offscreen,
}

/// Describes a surface to be created by a [`GraphicsDevice`](super::GraphicsDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceDescriptor {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Target kind.
    pub mode: SurfaceMode,
    /// Whether a depth buffer must be attached.
    pub depth_buffer: bool,
}

/// A GPU render target owned by exactly one scene.
///
/// Every GPU call that touches the surface happens between [`lock`](Self::lock)
/// and [`unlock`](Self::unlock). Failures of the prepare, present and readback
/// steps mean the surface went stale and must be disposed; they are reported
/// as `false`, never as errors.
pub trait Surface: Send + Debug {
    /// Width in device pixels, fixed at creation.
    fn width(&self) -> u32;

    /// Height in device pixels, fixed at creation.
    fn height(&self) -> u32;

    /// The target kind.
    fn mode(&self) -> SurfaceMode;

    /// Locks the surface's resources for this pulse.
    /// ## Returns
    /// `true` if the backing memory was lost and the surface must be recreated.
    fn lock(&mut self) -> bool;

    /// Releases the resources locked by [`lock`](Self::lock).
    fn unlock(&mut self);

    /// Returns `true` between `lock` and `unlock`.
    fn is_locked(&self) -> bool;

    /// Returns `true` if the device reported the backing memory lost.
    fn is_lost(&self) -> bool;

    /// The drawing context for this surface, `None` if the surface is not locked or lost.
    fn graphics(&mut self) -> Option<&mut dyn Graphics>;

    /// Flushes pending drawing for the given dirty area (whole surface if `None`).
    fn prepare(&mut self, dirty: Option<PixelRect>) -> bool;

    /// Flips the swap chain. Offscreen surfaces accept and ignore the call.
    fn present(&mut self) -> bool;

    /// Copies the surface content into `buffer`, resizing it as needed.
    fn read_pixels(&mut self, buffer: &mut PixelBuffer) -> bool;

    /// Releases every GPU resource. The surface is unusable afterwards.
    fn dispose(&mut self);
}
