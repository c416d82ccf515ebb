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
    Color, DirtyStatus, PainterSettings, PixelRect, RectBounds, SceneId, SceneNode, SceneState,
};
use lanterna_data::{GroupNode, RectNode};
use lanterna_lanes::DirtyRegionTracker;

fn state(width: u32, height: u32, pixel_scale: f32) -> SceneState {
    SceneState {
        width,
        height,
        handle_valid: true,
        visible: true,
        pixel_scale,
        ..SceneState::detached(SceneId::next())
    }
}

/// A clean 800x600 scene: background plus the given rectangles.
fn clean_scene(rects: &[RectBounds]) -> GroupNode {
    let mut root = GroupNode::new();
    root.add_child(RectNode::new(
        RectBounds::new(0.0, 0.0, 800.0, 600.0),
        Color::WHITE,
    ));
    for rect in rects {
        root.add_child(RectNode::new(*rect, Color::BLACK));
    }
    root.clear_dirty();
    root
}

fn touch(root: &mut GroupNode, index: usize) {
    let rect = root
        .child_mut(index)
        .and_then(|n| n.as_rect_mut())
        .expect("child is a rectangle");
    let fill = if rect.fill() == Color::BLACK {
        Color::WHITE
    } else {
        Color::BLACK
    };
    rect.set_fill(fill);
}

#[test]
fn test_clean_scene_has_no_regions() {
    let root = clean_scene(&[RectBounds::new(10.0, 10.0, 5.0, 5.0)]);
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert!(set.is_clean());
}

#[test]
fn test_fractional_bounds_round_outward() {
    let mut root = clean_scene(&[RectBounds::new(10.5, 20.25, 5.0, 5.0)]);
    touch(&mut root, 1);
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert_eq!(set.regions, vec![PixelRect::new(10, 20, 6, 6)]);
}

#[test]
fn test_regions_are_clipped_to_the_surface() {
    let mut root = clean_scene(&[
        RectBounds::new(790.0, 590.0, 40.0, 40.0),
        RectBounds::new(900.0, 900.0, 10.0, 10.0),
    ]);
    touch(&mut root, 1);
    touch(&mut root, 2);
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert_eq!(set.status, DirtyStatus::Ok);
    assert_eq!(set.regions, vec![PixelRect::new(790, 590, 10, 10)]);
}

#[test]
fn test_large_change_forces_full_redraw() {
    // 700x600 covers more than 75% of an 800x600 surface.
    let mut root = clean_scene(&[RectBounds::new(0.0, 0.0, 700.0, 600.0)]);
    touch(&mut root, 1);
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert_eq!(set.status, DirtyStatus::ContainsClip);
    assert!(set.requires_full_redraw());
    assert!(set.regions.is_empty());
}

#[test]
fn test_too_many_regions_overflow() {
    let rects: Vec<_> = (0..8)
        .map(|i| RectBounds::new(i as f32 * 50.0, 10.0, 10.0, 10.0))
        .collect();
    let mut root = clean_scene(&rects);
    for index in 1..=8 {
        touch(&mut root, index);
    }
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert_eq!(set.status, DirtyStatus::TooComplex);
}

#[test]
fn test_failed_walk_reports_too_complex() {
    let mut root = clean_scene(&[RectBounds::new(10.0, 10.0, 10.0, 10.0)]);
    root.set_translation(f32::INFINITY, 0.0);
    let settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);

    let set = tracker.accumulate(&root, &state(800, 600, 1.0), &settings);

    assert_eq!(set.status, DirtyStatus::TooComplex);
}

#[test]
fn test_configure_resizes_capacity() {
    let mut settings = PainterSettings::default();
    let mut tracker = DirtyRegionTracker::new(&settings);
    assert_eq!(tracker.capacity(), 6);

    settings.max_dirty_regions = 10;
    tracker.configure(&settings);
    assert_eq!(tracker.capacity(), 10);
}

#[test]
fn test_ok_sets_are_bounded_and_disjoint() {
    let settings = PainterSettings {
        max_dirty_regions: 4,
        ..PainterSettings::default()
    };
    let mut tracker = DirtyRegionTracker::new(&settings);
    let mut seed: u32 = 0x2545_F491;
    let mut next = move |limit: u32| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed % limit) as f32
    };

    for round in 0..200 {
        let count = 1 + (round % 7);
        let rects: Vec<_> = (0..count)
            .map(|_| RectBounds::new(next(820), next(620), next(60) + 0.5, next(60) + 0.25))
            .collect();
        let mut root = clean_scene(&rects);
        for index in 1..=rects.len() {
            touch(&mut root, index);
        }
        let scale = if round % 2 == 0 { 1.0 } else { 1.5 };

        let set = tracker.accumulate(&root, &state(800, 600, scale), &settings);

        if set.status == DirtyStatus::Ok {
            assert!(set.regions.len() <= tracker.capacity());
            for (i, a) in set.regions.iter().enumerate() {
                assert!(!a.is_degenerate());
                for b in &set.regions[i + 1..] {
                    assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                }
            }
        } else {
            assert!(set.regions.is_empty());
        }
    }
}
