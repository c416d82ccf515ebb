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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// A CPU-visible block of premultiplied `0xAARRGGBB` pixels, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Creates a zeroed (transparent) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes the buffer, keeping the allocation when possible.
    /// Content is unspecified after a size change.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width as usize * height as usize, 0);
    }

    /// The pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable access to the pixels, row-major.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// The pixels reinterpreted as raw bytes, for handing to a host API.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Reads one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// A caller-owned pixel buffer that a host toolkit reads on its own schedule.
///
/// The embedded painter writes into it under its mutex and bumps the frame id
/// after every complete frame; the host compares frame ids to know whether
/// anything new arrived.
#[derive(Debug, Default)]
pub struct EmbeddedBuffer {
    pixels: Mutex<PixelBuffer>,
    frame_id: AtomicU64,
}

impl EmbeddedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `write` against the buffer. When it returns `true` the frame id
    /// is incremented and the new frame becomes visible to readers.
    pub fn update<F>(&self, write: F) -> bool
    where
        F: FnOnce(&mut PixelBuffer) -> bool,
    {
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        let written = write(&mut pixels);
        if written {
            self.frame_id.fetch_add(1, Ordering::Release);
        }
        written
    }

    /// Runs `read` against the current content.
    pub fn read<R>(&self, read: impl FnOnce(&PixelBuffer) -> R) -> R {
        let pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        read(&pixels)
    }

    /// Number of complete frames written so far.
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_lookup_is_bounds_checked() {
        let mut buffer = PixelBuffer::new(4, 2);
        buffer.pixels_mut()[4 + 3] = 0xFF00_FF00;
        assert_eq!(buffer.pixel(3, 1), Some(0xFF00_FF00));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
        assert_eq!(buffer.as_bytes().len(), 4 * 2 * 4);
    }

    #[test]
    fn test_resize_changes_length() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.resize(3, 5);
        assert_eq!(buffer.pixels().len(), 15);
        assert_eq!((buffer.width(), buffer.height()), (3, 5));
    }

    #[test]
    fn test_embedded_frame_id_only_moves_on_success() {
        let embedded = EmbeddedBuffer::new();
        assert!(!embedded.update(|_| false));
        assert_eq!(embedded.frame_id(), 0);

        assert!(embedded.update(|buf| {
            buf.resize(1, 1);
            buf.pixels_mut()[0] = 0xFFFF_FFFF;
            true
        }));
        assert_eq!(embedded.frame_id(), 1);
        assert_eq!(embedded.read(|buf| buf.pixel(0, 0)), Some(0xFFFF_FFFF));
    }
}
