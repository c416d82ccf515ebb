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

use std::sync::atomic::{AtomicBool, Ordering};

/// Repaint flags shared by the scene thread and the render thread.
///
/// A lost race on any of these only causes a redundant or skipped repaint,
/// so plain atomics are enough; snapshot and surface state use the render
/// lock instead.
#[derive(Debug)]
pub struct SceneFlags {
    entire_dirty: AtomicBool,
    frame_pending: AtomicBool,
    present_requested: AtomicBool,
}

impl SceneFlags {
    /// Creates flags for a new scene. The first paint is always a full one.
    pub fn new() -> Self {
        Self {
            entire_dirty: AtomicBool::new(true),
            frame_pending: AtomicBool::new(false),
            present_requested: AtomicBool::new(false),
        }
    }

    /// Forces a full, unclipped repaint on the next pulse.
    pub fn mark_entire_dirty(&self) {
        self.entire_dirty.store(true, Ordering::Release);
    }

    /// Clears the whole-dirty flag after a successful full paint.
    pub fn clear_entire_dirty(&self) {
        self.entire_dirty.store(false, Ordering::Release);
    }

    /// Returns `true` if the next paint must cover the whole surface.
    pub fn is_entire_dirty(&self) -> bool {
        self.entire_dirty.load(Ordering::Acquire)
    }

    /// Marks a render job as queued. Returns the previous value, so a caller
    /// can tell whether a job was already in flight.
    pub fn set_frame_pending(&self, pending: bool) -> bool {
        self.frame_pending.swap(pending, Ordering::AcqRel)
    }

    /// Returns `true` while a render job for this scene is queued or running.
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending.load(Ordering::Acquire)
    }

    /// Asks the painter to display the surface even if nothing was redrawn.
    pub fn request_present(&self) {
        self.present_requested.store(true, Ordering::Release);
    }

    /// Consumes a pending present request.
    pub fn take_present_request(&self) -> bool {
        self.present_requested.swap(false, Ordering::AcqRel)
    }
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_starts_entire_dirty() {
        let flags = SceneFlags::new();
        assert!(flags.is_entire_dirty());
        assert!(!flags.is_frame_pending());
        flags.clear_entire_dirty();
        assert!(!flags.is_entire_dirty());
    }

    #[test]
    fn test_frame_pending_swap_reports_previous() {
        let flags = SceneFlags::default();
        assert!(!flags.set_frame_pending(true));
        assert!(flags.set_frame_pending(true));
        assert!(flags.set_frame_pending(false));
    }

    #[test]
    fn test_present_request_is_consumed_once() {
        let flags = SceneFlags::new();
        flags.request_present();
        assert!(flags.take_present_request());
        assert!(!flags.take_present_request());
    }
}
