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

//! Axis-aligned rectangles in logical (scene) space and in device pixels.
//!
//! Dirty regions are accumulated as [`RectBounds`] in scene coordinates and
//! converted to [`PixelRect`] only when they are handed to the rasterizer,
//! because GPU clipping operates on whole pixels.

use super::EPSILON;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in logical scene coordinates.
///
/// A `RectBounds` is empty when its maximum corner does not lie strictly
/// beyond its minimum corner on both axes. Any `NaN` component also makes it
/// empty, so a node reporting garbage bounds never produces a dirty region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectBounds {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge (exclusive).
    pub max_x: f32,
    /// Bottom edge (exclusive).
    pub max_y: f32,
}

impl RectBounds {
    /// An empty rectangle that acts as the identity for [`union`](Self::union).
    pub const EMPTY: Self = Self {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    /// Creates bounds from an origin and a size.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Creates bounds from two corners, normalizing their order.
    #[inline]
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Width of the bounds, `0.0` when empty.
    #[inline]
    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Height of the bounds, `0.0` when empty.
    #[inline]
    pub fn height(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Area of the bounds, `0.0` when empty.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Returns `true` if the bounds enclose no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }

    /// Returns `true` if every component is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Returns `true` if both rectangles share a region of positive area.
    #[inline]
    pub fn intersects(&self, other: &RectBounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Returns `true` if the gap between the two rectangles is at most
    /// `tolerance` on both axes. Overlapping rectangles are always near.
    #[inline]
    pub fn is_near(&self, other: &RectBounds, tolerance: f32) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x + tolerance
            && other.min_x <= self.max_x + tolerance
            && self.min_y <= other.max_y + tolerance
            && other.min_y <= self.max_y + tolerance
    }

    /// Returns `true` if `other` lies entirely inside `self` (equal bounds count).
    #[inline]
    pub fn contains(&self, other: &RectBounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.min_x + EPSILON
            && self.min_y <= other.min_y + EPSILON
            && self.max_x + EPSILON >= other.max_x
            && self.max_y + EPSILON >= other.max_y
    }

    /// Smallest bounds enclosing both rectangles. Empty inputs are ignored.
    #[inline]
    pub fn union(&self, other: &RectBounds) -> RectBounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        RectBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Overlap of both rectangles, [`RectBounds::EMPTY`] when disjoint.
    #[inline]
    pub fn intersection(&self, other: &RectBounds) -> RectBounds {
        let result = RectBounds {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        };
        if result.is_empty() {
            RectBounds::EMPTY
        } else {
            result
        }
    }

    /// Returns the bounds moved by `(dx, dy)`.
    #[inline]
    pub fn translated(&self, dx: f32, dy: f32) -> RectBounds {
        if self.is_empty() {
            return *self;
        }
        RectBounds {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Returns the bounds multiplied by a uniform scale around the origin.
    #[inline]
    pub fn scaled(&self, scale: f32) -> RectBounds {
        if self.is_empty() {
            return *self;
        }
        RectBounds {
            min_x: self.min_x * scale,
            min_y: self.min_y * scale,
            max_x: self.max_x * scale,
            max_y: self.max_y * scale,
        }
    }

    /// Rounds the bounds outward to whole pixels.
    ///
    /// A fractional edge always grows the rectangle, so a bounding box that
    /// touches a pixel by any amount repaints that whole pixel. Values beyond
    /// the `i32` range saturate.
    pub fn round_out(&self) -> PixelRect {
        if self.is_empty() {
            return PixelRect::new(0, 0, 0, 0);
        }
        let x0 = self.min_x.floor() as i32;
        let y0 = self.min_y.floor() as i32;
        let x1 = self.max_x.ceil() as i32;
        let y1 = self.max_y.ceil() as i32;
        PixelRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

impl Default for RectBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl approx::AbsDiffEq for RectBounds {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f32::abs_diff_eq(&self.min_x, &other.min_x, epsilon)
            && f32::abs_diff_eq(&self.min_y, &other.min_y, epsilon)
            && f32::abs_diff_eq(&self.max_x, &other.max_x, epsilon)
            && f32::abs_diff_eq(&self.max_y, &other.max_y, epsilon)
    }
}

/// An axis-aligned rectangle in integer device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl PixelRect {
    /// Creates a new pixel rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole surface of the given size.
    #[inline]
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(
            0,
            0,
            width.min(i32::MAX as u32) as i32,
            height.min(i32::MAX as u32) as i32,
        )
    }

    /// Returns `true` if the rectangle has no positive width or height.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            i64::from(self.width) * i64::from(self.height)
        }
    }

    /// Returns `true` if both rectangles share at least one pixel.
    #[inline]
    pub fn intersects(&self, other: &PixelRect) -> bool {
        !self.is_degenerate()
            && !other.is_degenerate()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[inline]
    pub fn contains(&self, other: &PixelRect) -> bool {
        !other.is_degenerate()
            && self.x <= other.x
            && self.y <= other.y
            && self.max_x() >= other.max_x()
            && self.max_y() >= other.max_y()
    }

    /// Shared pixels of both rectangles, `None` when disjoint.
    pub fn intersection(&self, other: &PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        let rect = PixelRect::new(x0, y0, x1 - x0, y1 - y0);
        (!rect.is_degenerate()).then_some(rect)
    }

    /// Smallest rectangle enclosing both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_degenerate() {
            return *other;
        }
        if other.is_degenerate() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.max_x().max(other.max_x());
        let y1 = self.max_y().max(other.max_y());
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Converts back to logical bounds at scale `1.0`.
    #[inline]
    pub fn to_bounds(&self) -> RectBounds {
        RectBounds::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_bounds_are_union_identity() {
        let r = RectBounds::new(10.0, 20.0, 5.0, 5.0);
        assert_eq!(RectBounds::EMPTY.union(&r), r);
        assert_eq!(r.union(&RectBounds::EMPTY), r);
        assert!(RectBounds::EMPTY.is_empty());
        assert_eq!(RectBounds::EMPTY.area(), 0.0);
    }

    #[test]
    fn test_nan_bounds_are_empty() {
        let r = RectBounds::new(f32::NAN, 0.0, 10.0, 10.0);
        assert!(r.is_empty());
        assert!(!r.is_finite());
    }

    #[test]
    fn test_intersection_of_disjoint_is_empty() {
        let a = RectBounds::new(0.0, 0.0, 10.0, 10.0);
        let b = RectBounds::new(20.0, 20.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_touching_rects_are_near_but_do_not_intersect() {
        let a = RectBounds::new(0.0, 0.0, 10.0, 10.0);
        let b = RectBounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.is_near(&b, 0.0));

        let c = RectBounds::new(11.5, 0.0, 10.0, 10.0);
        assert!(a.is_near(&c, 1.5));
        assert!(!a.is_near(&c, 1.0));
    }

    #[test]
    fn test_contains_includes_equal_bounds() {
        let a = RectBounds::new(0.0, 0.0, 800.0, 600.0);
        assert!(a.contains(&a));
        assert!(a.contains(&RectBounds::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!a.contains(&RectBounds::new(790.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn test_round_out_grows_fractional_edges() {
        let r = RectBounds::new(10.2, 20.7, 49.6, 0.1);
        let px = r.round_out();
        assert_eq!(px, PixelRect::new(10, 20, 50, 1));
    }

    #[test]
    fn test_round_out_keeps_integral_edges() {
        let r = RectBounds::new(100.0, 100.0, 50.0, 50.0);
        assert_eq!(r.round_out(), PixelRect::new(100, 100, 50, 50));
    }

    #[test]
    fn test_scaled_and_translated() {
        let r = RectBounds::new(1.0, 2.0, 3.0, 4.0);
        assert_abs_diff_eq!(r.scaled(2.0), RectBounds::new(2.0, 4.0, 6.0, 8.0));
        assert_abs_diff_eq!(r.translated(-1.0, 1.0), RectBounds::new(0.0, 3.0, 3.0, 4.0));
    }

    #[test]
    fn test_pixel_rect_intersection_and_union() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(PixelRect::new(5, 5, 5, 5)));
        assert_eq!(a.union(&b), PixelRect::new(0, 0, 15, 15));
        assert_eq!(a.intersection(&PixelRect::new(10, 0, 5, 5)), None);
        assert_eq!(a.area(), 100);
    }

    #[test]
    fn test_pixel_rect_degenerate() {
        assert!(PixelRect::new(0, 0, 0, 5).is_degenerate());
        assert!(PixelRect::new(0, 0, 5, -1).is_degenerate());
        assert_eq!(PixelRect::new(0, 0, 5, -1).area(), 0);
        assert!(!PixelRect::of_size(1, 1).is_degenerate());
    }
}
