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

use crate::math::{Color, PixelRect, RectBounds};

/// A drawing context bound to one surface for the duration of a draw pass.
///
/// Nodes draw in logical coordinates. The context maps them to device pixels
/// through the current translation and pixel scale, and discards everything
/// outside the clip rectangle.
pub trait Graphics {
    /// Width of the target in device pixels.
    fn width(&self) -> u32;

    /// Height of the target in device pixels.
    fn height(&self) -> u32;

    /// Restricts all following operations to `clip` (device pixels).
    /// `None` removes the restriction.
    fn set_clip_rect(&mut self, clip: Option<PixelRect>);

    /// The active clip rectangle, if any.
    fn clip_rect(&self) -> Option<PixelRect>;

    /// Sets the ratio between device pixels and logical units.
    fn set_pixel_scale(&mut self, scale: f32);

    /// The current ratio between device pixels and logical units.
    fn pixel_scale(&self) -> f32;

    /// The current logical translation.
    fn translation(&self) -> (f32, f32);

    /// Replaces the current logical translation.
    fn set_translation(&mut self, dx: f32, dy: f32);

    /// Adds `(dx, dy)` to the current logical translation.
    fn translate(&mut self, dx: f32, dy: f32) {
        let (x, y) = self.translation();
        self.set_translation(x + dx, y + dy);
    }

    /// Replaces every pixel inside the clip with `color`.
    fn clear(&mut self, color: Color);

    /// Fills a rectangle given in logical coordinates, blending source-over.
    fn fill_rect(&mut self, bounds: RectBounds, color: Color);

    /// Outlines a rectangle given in device pixels. Ignores translation and scale.
    fn stroke_rect(&mut self, rect: PixelRect, color: Color);
}
