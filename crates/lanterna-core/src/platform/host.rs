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

use std::fmt::Debug;

/// A trait that abstracts the window or view hosting a scene.
///
/// Any windowing or embedding backend can implement this trait. The painter
/// never calls it directly: its fields are copied into a
/// [`SceneState`](crate::scene::SceneState) during the sync step.
pub trait HostView: Send + Sync + Debug {
    /// Returns the unique identifier for the host.
    fn id(&self) -> u64;

    /// Returns the logical dimensions (width, height) of the content area.
    fn size(&self) -> (u32, u32);

    /// Returns the ratio between device pixels and logical units.
    fn scale_factor(&self) -> f32;

    /// Returns `true` while the native window or texture handle is alive.
    fn is_handle_valid(&self) -> bool;

    /// Returns `true` if the window is minimized.
    fn is_minimized(&self) -> bool {
        false
    }

    /// Returns `true` if the window is shown.
    fn is_visible(&self) -> bool {
        true
    }
}
