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

//! A windowless host whose geometry is driven by the caller.

use lanterna_core::{HostView, PixelBuffer, PixelSink, UploadSlot};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// A host view with no native window behind it.
///
/// Every property is an atomic so a test (or an embedding toolkit) can change
/// the geometry from the scene thread while the render thread holds a
/// reference. Uploaded frames land in an [`UploadSlot`].
#[derive(Debug)]
pub struct HeadlessView {
    id: u64,
    width: AtomicU32,
    height: AtomicU32,
    scale_bits: AtomicU32,
    handle_valid: AtomicBool,
    minimized: AtomicBool,
    visible: AtomicBool,
    uploads: UploadSlot,
}

/// A builder for creating [`HeadlessView`] instances.
pub struct HeadlessViewBuilder {
    width: u32,
    height: u32,
    scale_factor: f32,
}

impl HeadlessViewBuilder {
    /// Creates a builder for an 800x600 view at scale 1.
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            scale_factor: 1.0,
        }
    }

    /// Sets the logical content size.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the device pixel ratio.
    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Builds the view.
    pub fn build(self) -> HeadlessView {
        let id = NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "HeadlessView[{id}]: created {}x{} at scale {}",
            self.width,
            self.height,
            self.scale_factor
        );
        HeadlessView {
            id,
            width: AtomicU32::new(self.width),
            height: AtomicU32::new(self.height),
            scale_bits: AtomicU32::new(self.scale_factor.to_bits()),
            handle_valid: AtomicBool::new(true),
            minimized: AtomicBool::new(false),
            visible: AtomicBool::new(true),
            uploads: UploadSlot::new(),
        }
    }
}

impl Default for HeadlessViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessView {
    /// Shorthand for a view of the given logical size at scale 1.
    pub fn new(width: u32, height: u32) -> Self {
        HeadlessViewBuilder::new()
            .with_dimensions(width, height)
            .build()
    }

    /// Returns a builder.
    pub fn builder() -> HeadlessViewBuilder {
        HeadlessViewBuilder::new()
    }

    /// Changes the logical content size.
    pub fn resize(&self, width: u32, height: u32) {
        self.width.store(width, Ordering::Release);
        self.height.store(height, Ordering::Release);
    }

    /// Changes the device pixel ratio.
    pub fn set_scale_factor(&self, scale_factor: f32) {
        self.scale_bits
            .store(scale_factor.to_bits(), Ordering::Release);
    }

    /// Simulates the native handle being destroyed or recreated.
    pub fn set_handle_valid(&self, valid: bool) {
        self.handle_valid.store(valid, Ordering::Release);
    }

    /// Simulates minimizing or restoring the window.
    pub fn set_minimized(&self, minimized: bool) {
        self.minimized.store(minimized, Ordering::Release);
    }

    /// Simulates showing or hiding the window.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }

    /// The mailbox receiving uploaded frames.
    pub fn upload_slot(&self) -> &UploadSlot {
        &self.uploads
    }
}

impl HostView for HeadlessView {
    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::Acquire),
            self.height.load(Ordering::Acquire),
        )
    }

    fn scale_factor(&self) -> f32 {
        f32::from_bits(self.scale_bits.load(Ordering::Acquire))
    }

    fn is_handle_valid(&self) -> bool {
        self.handle_valid.load(Ordering::Acquire)
    }

    fn is_minimized(&self) -> bool {
        self.minimized.load(Ordering::Acquire)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}

impl PixelSink for HeadlessView {
    fn next_generation(&self) -> u64 {
        self.uploads.next_generation()
    }

    fn upload_pixels(&self, buffer: PixelBuffer, generation: u64) -> bool {
        self.uploads.offer(buffer, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builder_and_setters() {
        let view = HeadlessView::builder()
            .with_dimensions(320, 200)
            .with_scale_factor(1.5)
            .build();
        assert_eq!(view.size(), (320, 200));
        assert_relative_eq!(view.scale_factor(), 1.5);

        view.resize(321, 200);
        view.set_scale_factor(2.0);
        view.set_handle_valid(false);
        assert_eq!(view.size(), (321, 200));
        assert_relative_eq!(view.scale_factor(), 2.0);
        assert!(!view.is_handle_valid());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(HeadlessView::new(1, 1).id(), HeadlessView::new(1, 1).id());
    }

    #[test]
    fn test_uploads_reach_the_slot() {
        let view = HeadlessView::new(2, 2);
        assert!(view.upload_pixels(PixelBuffer::new(2, 2), 1));
        assert!(!view.upload_pixels(PixelBuffer::new(2, 2), 1));
        assert_eq!(view.upload_slot().take().map(|u| u.generation), Some(1));
    }
}
