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

//! Dirty region bookkeeping shared by scene nodes and the region tracker.

use crate::math::{PixelRect, RectBounds};

/// Outcome of a dirty region accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DirtyStatus {
    /// The collected regions are valid and bounded in count.
    #[default]
    Ok,
    /// A changed area covers the whole visible surface.
    ContainsClip,
    /// Accumulation overflowed the container or the walk failed.
    TooComplex,
}

impl DirtyStatus {
    /// Returns `true` if the caller must fall back to one unclipped pass.
    #[inline]
    pub fn requires_full_redraw(&self) -> bool {
        !matches!(self, DirtyStatus::Ok)
    }
}

/// A bounded pool of logical dirty rectangles.
///
/// Rectangles that overlap or lie within the merge tolerance of each other are
/// coalesced as they are added, so the stored regions are always pairwise
/// apart. When a new, separate region would exceed the capacity, the container
/// reports [`DirtyStatus::TooComplex`] and keeps its previous content.
#[derive(Debug, Clone)]
pub struct DirtyRegionContainer {
    regions: Vec<RectBounds>,
    capacity: usize,
    tolerance: f32,
    overflowed: bool,
}

impl DirtyRegionContainer {
    /// Creates an empty container.
    ///
    /// ## Arguments
    /// * `capacity` - Maximum number of separate regions. Clamped to at least one.
    /// * `tolerance` - Gap, in logical units, under which two regions are merged.
    pub fn new(capacity: usize, tolerance: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            regions: Vec::with_capacity(capacity),
            capacity,
            tolerance: tolerance.max(0.0),
            overflowed: false,
        }
    }

    /// Adds a region, merging it with every region it touches.
    ///
    /// Empty and non-finite regions are ignored.
    pub fn add(&mut self, region: RectBounds) -> DirtyStatus {
        if self.overflowed {
            return DirtyStatus::TooComplex;
        }
        if region.is_empty() || !region.is_finite() {
            return DirtyStatus::Ok;
        }

        let mut merged = region;
        // Merging can grow the candidate into a third region, so repeat
        // until nothing else is near it.
        while let Some(index) = self
            .regions
            .iter()
            .position(|existing| existing.is_near(&merged, self.tolerance))
        {
            let existing = self.regions.swap_remove(index);
            merged = merged.union(&existing);
        }

        if self.regions.len() >= self.capacity {
            // Put back a conservative cover so the content stays meaningful.
            let cover = self
                .regions
                .iter()
                .fold(merged, |acc, r| acc.union(r));
            self.regions.clear();
            self.regions.push(cover);
            self.overflowed = true;
            return DirtyStatus::TooComplex;
        }

        self.regions.push(merged);
        DirtyStatus::Ok
    }

    /// Adds every region of `other`.
    pub fn merge(&mut self, other: &DirtyRegionContainer) -> DirtyStatus {
        if other.overflowed {
            self.overflowed = true;
            return DirtyStatus::TooComplex;
        }
        for region in &other.regions {
            if self.add(*region) == DirtyStatus::TooComplex {
                return DirtyStatus::TooComplex;
            }
        }
        DirtyStatus::Ok
    }

    /// Empties the container for reuse on the next pulse.
    pub fn reset(&mut self) {
        self.regions.clear();
        self.overflowed = false;
    }

    /// The stored regions, in insertion order after merges.
    pub fn regions(&self) -> &[RectBounds] {
        &self.regions
    }

    /// Number of stored regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if no region is stored.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Maximum number of separate regions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Merge tolerance in logical units.
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Returns `true` once an [`add`](Self::add) exceeded the capacity.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Union of all stored regions.
    pub fn bounds(&self) -> RectBounds {
        self.regions
            .iter()
            .fold(RectBounds::EMPTY, |acc, r| acc.union(r))
    }
}

/// The per-pulse repaint list handed to the painter.
///
/// Regions are in device pixels, non-degenerate, and pairwise disjoint. When
/// the status requires a full redraw the region list is meaningless and empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirtyRegionSet {
    /// Device-pixel rectangles to repaint.
    pub regions: Vec<PixelRect>,
    /// Status of the accumulation that produced the set.
    pub status: DirtyStatus,
}

impl DirtyRegionSet {
    /// A set of bounded regions.
    pub fn bounded(regions: Vec<PixelRect>) -> Self {
        Self {
            regions,
            status: DirtyStatus::Ok,
        }
    }

    /// A set requesting one unclipped pass.
    pub fn full_redraw(status: DirtyStatus) -> Self {
        debug_assert!(status.requires_full_redraw());
        Self {
            regions: Vec::new(),
            status,
        }
    }

    /// Returns `true` if the painter must draw the whole surface.
    pub fn requires_full_redraw(&self) -> bool {
        self.status.requires_full_redraw()
    }

    /// Returns `true` if nothing needs repainting.
    pub fn is_clean(&self) -> bool {
        self.status == DirtyStatus::Ok && self.regions.is_empty()
    }

    /// Union of all regions.
    pub fn bounds(&self) -> Option<PixelRect> {
        self.regions
            .iter()
            .copied()
            .reduce(|acc, r| acc.union(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> RectBounds {
        RectBounds::new(x, y, w, h)
    }

    #[test]
    fn test_add_merges_overlapping_regions() {
        let mut container = DirtyRegionContainer::new(6, 0.0);
        assert_eq!(container.add(rect(0.0, 0.0, 10.0, 10.0)), DirtyStatus::Ok);
        assert_eq!(container.add(rect(5.0, 5.0, 10.0, 10.0)), DirtyStatus::Ok);
        assert_eq!(container.len(), 1);
        assert_eq!(container.regions()[0], rect(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn test_add_merges_within_tolerance() {
        let mut container = DirtyRegionContainer::new(6, 1.0);
        container.add(rect(0.0, 0.0, 10.0, 10.0));
        container.add(rect(10.5, 0.0, 10.0, 10.0));
        assert_eq!(container.len(), 1);

        container.add(rect(40.0, 0.0, 10.0, 10.0));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_merge_cascades_through_bridging_region() {
        let mut container = DirtyRegionContainer::new(6, 0.0);
        container.add(rect(0.0, 0.0, 10.0, 10.0));
        container.add(rect(30.0, 0.0, 10.0, 10.0));
        assert_eq!(container.len(), 2);

        // Touches both; the result must be a single region.
        container.add(rect(5.0, 0.0, 30.0, 10.0));
        assert_eq!(container.len(), 1);
        assert_eq!(container.regions()[0], rect(0.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn test_overflow_reports_too_complex() {
        let mut container = DirtyRegionContainer::new(2, 0.0);
        assert_eq!(container.add(rect(0.0, 0.0, 1.0, 1.0)), DirtyStatus::Ok);
        assert_eq!(container.add(rect(10.0, 0.0, 1.0, 1.0)), DirtyStatus::Ok);
        assert_eq!(
            container.add(rect(20.0, 0.0, 1.0, 1.0)),
            DirtyStatus::TooComplex
        );
        assert!(container.is_overflowed());
        assert_eq!(container.bounds(), rect(0.0, 0.0, 21.0, 1.0));

        container.reset();
        assert!(!container.is_overflowed());
        assert!(container.is_empty());
    }

    #[test]
    fn test_empty_and_nan_regions_are_ignored() {
        let mut container = DirtyRegionContainer::new(1, 0.0);
        assert_eq!(container.add(RectBounds::EMPTY), DirtyStatus::Ok);
        assert_eq!(
            container.add(rect(f32::NAN, 0.0, 5.0, 5.0)),
            DirtyStatus::Ok
        );
        assert!(container.is_empty());
    }

    #[test]
    fn test_region_set_status() {
        let clean = DirtyRegionSet::default();
        assert!(clean.is_clean());
        assert!(!clean.requires_full_redraw());

        let full = DirtyRegionSet::full_redraw(DirtyStatus::ContainsClip);
        assert!(full.requires_full_redraw());
        assert!(!full.is_clean());

        let bounded = DirtyRegionSet::bounded(vec![
            PixelRect::new(0, 0, 10, 10),
            PixelRect::new(20, 20, 5, 5),
        ]);
        assert_eq!(bounded.bounds(), Some(PixelRect::new(0, 0, 25, 25)));
    }
}
