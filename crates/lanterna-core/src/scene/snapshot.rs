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

//! The immutable per-pulse capture of surface geometry.
//!
//! A [`SceneState`] is copied from live host fields while the render lock is
//! held and then handed to the render thread, which reads it without touching
//! the host again. It is never mutated: the next sync step produces a new
//! value that replaces the old one.

use crate::math::{PixelRect, RectBounds};
use crate::platform::HostView;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a scene.
///
/// Used as the registry key so that a detached scene can be dropped without
/// every collaborator having to hold a strong reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    /// Allocates a fresh, never reused identifier.
    pub fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene {}", self.0)
    }
}

/// Snapshot of the surface geometry a painter run must honor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    /// The scene this snapshot was captured for.
    pub scene_id: SceneId,
    /// Logical width of the host content area.
    pub width: u32,
    /// Logical height of the host content area.
    pub height: u32,
    /// Whether the host still owns a live native window or texture handle.
    pub handle_valid: bool,
    /// Whether the host window is minimized.
    pub minimized: bool,
    /// Whether the host window is shown.
    pub visible: bool,
    /// Ratio between device pixels and logical units.
    pub pixel_scale: f32,
}

impl SceneState {
    /// Copies the live host fields. O(1): a handful of scalar reads.
    pub fn capture(scene_id: SceneId, host: &dyn HostView) -> Self {
        let (width, height) = host.size();
        Self {
            scene_id,
            width,
            height,
            handle_valid: host.is_handle_valid(),
            minimized: host.is_minimized(),
            visible: host.is_visible(),
            pixel_scale: host.scale_factor(),
        }
    }

    /// Snapshot of a scene with no host attached. Never valid.
    pub fn detached(scene_id: SceneId) -> Self {
        Self {
            scene_id,
            width: 0,
            height: 0,
            handle_valid: false,
            minimized: false,
            visible: false,
            pixel_scale: 1.0,
        }
    }

    /// Returns `true` if a painter run against this snapshot can produce pixels.
    pub fn is_paintable(&self) -> bool {
        self.handle_valid
            && self.visible
            && !self.minimized
            && self.width > 0
            && self.height > 0
            && self.pixel_scale.is_finite()
            && self.pixel_scale > 0.0
    }

    /// Size of the backing surface in device pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        let scale = if self.pixel_scale.is_finite() && self.pixel_scale > 0.0 {
            self.pixel_scale
        } else {
            1.0
        };
        (
            (self.width as f32 * scale).ceil() as u32,
            (self.height as f32 * scale).ceil() as u32,
        )
    }

    /// Content area in logical scene coordinates.
    pub fn logical_bounds(&self) -> RectBounds {
        RectBounds::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Surface area in device pixels.
    pub fn device_bounds(&self) -> PixelRect {
        let (w, h) = self.surface_size();
        PixelRect::of_size(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: u32, height: u32, scale: f32) -> SceneState {
        SceneState {
            scene_id: SceneId::next(),
            width,
            height,
            handle_valid: true,
            minimized: false,
            visible: true,
            pixel_scale: scale,
        }
    }

    #[test]
    fn test_scene_ids_are_unique() {
        let a = SceneId::next();
        let b = SceneId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_paintable_requires_positive_size_and_live_handle() {
        assert!(state(800, 600, 1.0).is_paintable());
        assert!(!state(0, 600, 1.0).is_paintable());
        assert!(!state(800, 0, 1.0).is_paintable());
        assert!(!state(800, 600, 0.0).is_paintable());
        assert!(!state(800, 600, f32::NAN).is_paintable());

        let mut s = state(800, 600, 1.0);
        s.handle_valid = false;
        assert!(!s.is_paintable());

        let mut s = state(800, 600, 1.0);
        s.minimized = true;
        assert!(!s.is_paintable());

        assert!(!SceneState::detached(SceneId::next()).is_paintable());
    }

    #[test]
    fn test_surface_size_applies_pixel_scale() {
        assert_eq!(state(800, 600, 1.0).surface_size(), (800, 600));
        assert_eq!(state(800, 600, 2.0).surface_size(), (1600, 1200));
        assert_eq!(state(101, 51, 1.5).surface_size(), (152, 77));
    }

    #[test]
    fn test_snapshot_is_a_value_copy() {
        let original = state(800, 600, 1.0);
        let mut copy = original;
        copy.width = 801;
        assert_eq!(original.width, 800);
        assert_ne!(original, copy);
    }
}
