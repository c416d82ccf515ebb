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

use super::{DeviceEvent, DeviceShared};
use lanterna_core::{Color, Graphics, PixelBuffer, PixelRect, RectBounds};
use std::sync::Arc;

/// A CPU drawing context over a premultiplied ARGB pixel buffer.
#[derive(Debug)]
pub struct SoftwareGraphics {
    surface_id: u64,
    shared: Arc<DeviceShared>,
    pixels: PixelBuffer,
    clip: Option<PixelRect>,
    pixel_scale: f32,
    translation: (f32, f32),
}

impl SoftwareGraphics {
    pub(crate) fn new(surface_id: u64, shared: Arc<DeviceShared>, width: u32, height: u32) -> Self {
        Self {
            surface_id,
            shared,
            pixels: PixelBuffer::new(width, height),
            clip: None,
            pixel_scale: 1.0,
            translation: (0.0, 0.0),
        }
    }

    /// The rendered pixels.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Resets per-pass state left over by a previous pulse.
    pub(crate) fn reset_state(&mut self) {
        self.clip = None;
        self.pixel_scale = 1.0;
        self.translation = (0.0, 0.0);
    }

    /// Intersection of `rect`, the surface and the clip.
    fn drawable(&self, rect: PixelRect) -> Option<PixelRect> {
        let surface = PixelRect::of_size(self.pixels.width(), self.pixels.height());
        let area = rect.intersection(&surface)?;
        match self.clip {
            Some(clip) => area.intersection(&clip),
            None => Some(area),
        }
    }

    fn for_each_pixel(&mut self, area: PixelRect, mut op: impl FnMut(u32) -> u32) {
        let width = self.pixels.width() as usize;
        let pixels = self.pixels.pixels_mut();
        for y in area.y..area.max_y() {
            let row = y as usize * width;
            for x in area.x..area.max_x() {
                let index = row + x as usize;
                pixels[index] = op(pixels[index]);
            }
        }
    }
}

/// Premultiplied source-over.
fn blend(src: u32, dst: u32) -> u32 {
    let inv_alpha = 255 - (src >> 24);
    let channel = |shift: u32| -> u32 {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        (s + (d * inv_alpha + 127) / 255).min(255) << shift
    };
    channel(24) | channel(16) | channel(8) | channel(0)
}

impl Graphics for SoftwareGraphics {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn set_clip_rect(&mut self, clip: Option<PixelRect>) {
        self.clip = clip;
        self.shared.record(DeviceEvent::ClipSet {
            id: self.surface_id,
            clip,
        });
    }

    fn clip_rect(&self) -> Option<PixelRect> {
        self.clip
    }

    fn set_pixel_scale(&mut self, scale: f32) {
        self.pixel_scale = scale;
    }

    fn pixel_scale(&self) -> f32 {
        self.pixel_scale
    }

    fn translation(&self) -> (f32, f32) {
        self.translation
    }

    fn set_translation(&mut self, dx: f32, dy: f32) {
        self.translation = (dx, dy);
    }

    fn clear(&mut self, color: Color) {
        self.shared.record(DeviceEvent::Cleared {
            id: self.surface_id,
        });
        let surface = PixelRect::of_size(self.pixels.width(), self.pixels.height());
        if let Some(area) = self.drawable(surface) {
            let value = color.to_premultiplied_argb();
            self.for_each_pixel(area, |_| value);
        }
    }

    fn fill_rect(&mut self, bounds: RectBounds, color: Color) {
        self.shared.record(DeviceEvent::Filled {
            id: self.surface_id,
        });
        let (dx, dy) = self.translation;
        let device = bounds.translated(dx, dy).scaled(self.pixel_scale);
        if device.is_empty() || !device.is_finite() {
            return;
        }
        // A pixel is covered when its center lies inside the rectangle.
        let x0 = device.min_x.round() as i32;
        let y0 = device.min_y.round() as i32;
        let x1 = device.max_x.round() as i32;
        let y1 = device.max_y.round() as i32;
        let Some(area) = self.drawable(PixelRect::new(x0, y0, x1 - x0, y1 - y0)) else {
            return;
        };
        let src = color.to_premultiplied_argb();
        if color.is_opaque() {
            self.for_each_pixel(area, |_| src);
        } else {
            self.for_each_pixel(area, |dst| blend(src, dst));
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color) {
        if rect.is_degenerate() {
            return;
        }
        let src = color.to_premultiplied_argb();
        let edges = [
            PixelRect::new(rect.x, rect.y, rect.width, 1),
            PixelRect::new(rect.x, rect.max_y() - 1, rect.width, 1),
            PixelRect::new(rect.x, rect.y, 1, rect.height),
            PixelRect::new(rect.max_x() - 1, rect.y, 1, rect.height),
        ];
        for edge in edges {
            if let Some(area) = self.drawable(edge) {
                self.for_each_pixel(area, |dst| blend(src, dst));
            }
        }
    }
}
