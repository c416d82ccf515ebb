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

use lanterna_core::{
    DirtyRegionContainer, DirtyRegionSet, DirtyStatus, PainterSettings, PixelRect, SceneNode,
    SceneState,
};

/// Produces the per-pulse repaint list of one scene.
///
/// The tracker owns a reusable [`DirtyRegionContainer`] sized from the
/// painter settings. Each call to [`accumulate`](Self::accumulate) starts from
/// an empty container; nothing is carried over between pulses.
#[derive(Debug)]
pub struct DirtyRegionTracker {
    container: DirtyRegionContainer,
}

impl DirtyRegionTracker {
    /// Creates a tracker for the given settings.
    pub fn new(settings: &PainterSettings) -> Self {
        Self {
            container: DirtyRegionContainer::new(
                settings.max_dirty_regions,
                settings.region_merge_tolerance,
            ),
        }
    }

    /// Resizes the container if the capacity or merge tolerance changed.
    pub fn configure(&mut self, settings: &PainterSettings) {
        if self.container.capacity() != settings.max_dirty_regions.max(1)
            || self.container.tolerance() != settings.region_merge_tolerance.max(0.0)
        {
            *self = Self::new(settings);
        }
    }

    /// Maximum number of regions an `Ok` set can hold.
    pub fn capacity(&self) -> usize {
        self.container.capacity()
    }

    /// Walks the dirty parts of `root` and returns the regions to repaint.
    ///
    /// ## Arguments
    /// * `root` - The scene's root content.
    /// * `state` - The snapshot whose surface the regions are meant for.
    /// * `settings` - Supplies the full-redraw area threshold.
    ///
    /// ## Returns
    /// A set in device pixels. Its status is [`DirtyStatus::ContainsClip`] when
    /// a changed area covers the surface or exceeds the area threshold, and
    /// [`DirtyStatus::TooComplex`] when the walk overflowed or failed.
    pub fn accumulate(
        &mut self,
        root: &dyn SceneNode,
        state: &SceneState,
        settings: &PainterSettings,
    ) -> DirtyRegionSet {
        self.container.reset();
        let clip = state.logical_bounds();

        match root.accumulate_dirty_regions(&clip, &mut self.container) {
            Ok(DirtyStatus::Ok) => {}
            Ok(status) => {
                log::trace!("DirtyRegionTracker[{}]: {status:?}", state.scene_id);
                return DirtyRegionSet::full_redraw(status);
            }
            Err(fault) => {
                log::warn!(
                    "DirtyRegionTracker[{}]: dirty walk failed, repainting everything: {fault}",
                    state.scene_id
                );
                return DirtyRegionSet::full_redraw(DirtyStatus::TooComplex);
            }
        }

        let threshold = clip.area() * settings.full_redraw_area_ratio;
        if self
            .container
            .regions()
            .iter()
            .any(|region| region.area() > threshold)
        {
            return DirtyRegionSet::full_redraw(DirtyStatus::ContainsClip);
        }

        let device = state.device_bounds();
        let scale = state.pixel_scale;
        let mut regions: Vec<PixelRect> = Vec::with_capacity(self.container.len());
        for region in self.container.regions() {
            let scaled = if scale == 1.0 {
                *region
            } else {
                region.scaled(scale)
            };
            let Some(pixels) = scaled.round_out().intersection(&device) else {
                continue;
            };
            push_disjoint(&mut regions, pixels);
        }

        log::trace!(
            "DirtyRegionTracker[{}]: {} region(s) {:?}",
            state.scene_id,
            regions.len(),
            regions
        );
        DirtyRegionSet::bounded(regions)
    }
}

/// Adds `rect`, merging every region it overlaps after rounding.
fn push_disjoint(regions: &mut Vec<PixelRect>, rect: PixelRect) {
    let mut merged = rect;
    while let Some(index) = regions.iter().position(|r| r.intersects(&merged)) {
        merged = merged.union(&regions.swap_remove(index));
    }
    regions.push(merged);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_disjoint_merges_rounding_overlaps() {
        let mut regions = Vec::new();
        push_disjoint(&mut regions, PixelRect::new(0, 0, 10, 10));
        push_disjoint(&mut regions, PixelRect::new(10, 0, 10, 10));
        assert_eq!(regions.len(), 2);

        push_disjoint(&mut regions, PixelRect::new(9, 0, 2, 2));
        assert_eq!(regions, vec![PixelRect::new(0, 0, 20, 10)]);
    }
}
