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

use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA color with `f32` components in `0.0..=1.0`.
///
/// Surfaces store pixels as premultiplied `0xAARRGGBB` words; the conversion
/// happens once in [`Color::to_premultiplied_argb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha (opacity) component.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Translucent red used to outline repainted regions in debug mode.
    pub const DIRTY_OVERLAY: Self = Self::new(1.0, 0.0, 0.0, 0.5);

    /// Creates a new color.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns `true` if the color fully hides whatever lies beneath it.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Packs the color as a premultiplied `0xAARRGGBB` word.
    pub fn to_premultiplied_argb(&self) -> u32 {
        let a = self.a.clamp(0.0, 1.0);
        let channel = |c: f32| -> u32 { ((c.clamp(0.0, 1.0) * a) * 255.0).round() as u32 };
        let alpha = (a * 255.0).round() as u32;
        (alpha << 24) | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiplied_packing() {
        assert_eq!(Color::WHITE.to_premultiplied_argb(), 0xFFFF_FFFF);
        assert_eq!(Color::BLACK.to_premultiplied_argb(), 0xFF00_0000);
        assert_eq!(Color::TRANSPARENT.to_premultiplied_argb(), 0);
        assert_eq!(Color::new(1.0, 0.0, 0.0, 0.5).to_premultiplied_argb(), 0x8080_0000);
    }

    #[test]
    fn test_from_rgb8_is_opaque() {
        let c = Color::from_rgb8(255, 0, 128);
        assert!(c.is_opaque());
        assert_eq!(c.to_premultiplied_argb(), 0xFFFF_0080);
    }
}
