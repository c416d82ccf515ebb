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

use super::surface::{Surface, SurfaceDescriptor};
use std::fmt::Debug;

/// The factory for render targets.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Returns a human-readable name of the device, used in logs.
    fn name(&self) -> &str;

    /// Returns `true` if the device can accept work right now.
    ///
    /// A device that is resetting or was lost reports `false`; the painter then
    /// skips the pulse and tries again on the next one.
    fn is_device_ready(&self) -> bool;

    /// Creates a new surface.
    /// ## Arguments
    /// * `descriptor` - Size in device pixels, target mode and depth buffer request.
    /// ## Returns
    /// The new surface, or `None` if the device could not allocate it
    /// (e.g. out of GPU memory). Never panics on resource exhaustion.
    fn create_surface(&self, descriptor: &SurfaceDescriptor) -> Option<Box<dyn Surface>>;
}
