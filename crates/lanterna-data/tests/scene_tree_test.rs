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

use approx::assert_abs_diff_eq;
use lanterna_core::{
    Color, DirtyRegionContainer, DirtyStatus, Graphics, NodeFault, NodePath, PixelRect,
    RectBounds, RenderRoot, SceneNode,
};
use lanterna_data::{GroupNode, RectNode};

// --- A GRAPHICS FAKE THAT RECORDS FILLS IN DEVICE COORDINATES ---
#[derive(Default)]
struct RecordingGraphics {
    translation: (f32, f32),
    clip: Option<PixelRect>,
    fills: Vec<(RectBounds, Color)>,
}

impl Graphics for RecordingGraphics {
    fn width(&self) -> u32 {
        800
    }
    fn height(&self) -> u32 {
        600
    }
    fn set_clip_rect(&mut self, clip: Option<PixelRect>) {
        self.clip = clip;
    }
    fn clip_rect(&self) -> Option<PixelRect> {
        self.clip
    }
    fn set_pixel_scale(&mut self, _scale: f32) {}
    fn pixel_scale(&self) -> f32 {
        1.0
    }
    fn translation(&self) -> (f32, f32) {
        self.translation
    }
    fn set_translation(&mut self, dx: f32, dy: f32) {
        self.translation = (dx, dy);
    }
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, bounds: RectBounds, color: Color) {
        let (dx, dy) = self.translation;
        self.fills.push((bounds.translated(dx, dy), color));
    }
    fn stroke_rect(&mut self, _rect: PixelRect, _color: Color) {}
}

fn scene_clip() -> RectBounds {
    RectBounds::new(0.0, 0.0, 800.0, 600.0)
}

fn accumulate(root: &GroupNode) -> (DirtyStatus, DirtyRegionContainer) {
    let mut regions = DirtyRegionContainer::new(6, 1.0);
    let status = root
        .accumulate_dirty_regions(&scene_clip(), &mut regions)
        .expect("walk should succeed");
    (status, regions)
}

/// A background covering the scene plus two small rects in a translated group.
fn build_scene() -> GroupNode {
    let mut root = GroupNode::new();
    root.add_child(RectNode::new(scene_clip(), Color::WHITE));

    let mut group = GroupNode::new();
    group.set_translation(100.0, 100.0);
    group.add_child(RectNode::new(RectBounds::new(0.0, 0.0, 50.0, 50.0), Color::BLACK));
    group.add_child(RectNode::new(RectBounds::new(300.0, 300.0, 20.0, 20.0), Color::BLACK));
    root.add_child(group);

    root.clear_dirty();
    root
}

#[test]
fn test_clean_tree_reports_no_regions() {
    let root = build_scene();
    assert!(!root.is_dirty());

    let (status, regions) = accumulate(&root);
    assert_eq!(status, DirtyStatus::Ok);
    assert!(regions.is_empty());
}

#[test]
fn test_recolored_child_is_reported_in_scene_coordinates() {
    // --- 1. ARRANGE ---
    let mut root = build_scene();
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    let rect = group.child_mut(0).and_then(|n| n.as_rect_mut()).unwrap();

    // --- 2. ACT ---
    rect.set_fill(Color::from_rgb8(200, 0, 0));
    let (status, regions) = accumulate(&root);

    // --- 3. ASSERT ---
    assert_eq!(status, DirtyStatus::Ok);
    assert_eq!(regions.regions(), &[RectBounds::new(100.0, 100.0, 50.0, 50.0)]);
}

#[test]
fn test_moved_group_reports_old_and_new_area() {
    let mut root = build_scene();
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    group.set_translation(110.0, 100.0);

    let (status, regions) = accumulate(&root);
    assert_eq!(status, DirtyStatus::Ok);
    assert_abs_diff_eq!(
        regions.bounds(),
        RectBounds::from_corners(100.0, 100.0, 430.0, 420.0)
    );
}

#[test]
fn test_removed_child_area_is_repainted_once() {
    let mut root = build_scene();
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    let removed = group.remove_child(1).expect("child exists");
    assert_eq!(removed.painted_bounds(), RectBounds::new(300.0, 300.0, 20.0, 20.0));

    let (_, regions) = accumulate(&root);
    assert_eq!(regions.regions(), &[RectBounds::new(400.0, 400.0, 20.0, 20.0)]);

    root.clear_dirty();
    let (_, regions) = accumulate(&root);
    assert!(regions.is_empty());
}

#[test]
fn test_changes_far_apart_stay_separate() {
    let mut root = build_scene();
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    for index in 0..2 {
        group
            .child_mut(index)
            .and_then(|n| n.as_rect_mut())
            .unwrap()
            .set_fill(Color::from_rgb8(0, 0, 200));
    }

    let (status, regions) = accumulate(&root);
    assert_eq!(status, DirtyStatus::Ok);
    assert_eq!(regions.len(), 2);
}

#[test]
fn test_changed_background_contains_clip() {
    let mut root = build_scene();
    root.child_mut(0)
        .and_then(|n| n.as_rect_mut())
        .unwrap()
        .set_fill(Color::BLACK);

    let (status, _) = accumulate(&root);
    assert_eq!(status, DirtyStatus::ContainsClip);
}

#[test]
fn test_invalid_translation_faults_the_walk() {
    let mut root = build_scene();
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    group.set_translation(f32::NAN, 0.0);

    let mut regions = DirtyRegionContainer::new(6, 1.0);
    let result = root.accumulate_dirty_regions(&scene_clip(), &mut regions);
    assert!(matches!(result, Err(NodeFault::InvalidTransform { .. })));

    let mut g = RecordingGraphics::default();
    assert!(root.render(&mut g).is_err());
    assert_eq!(g.translation, (0.0, 0.0), "translation must be restored");
}

#[test]
fn test_render_root_finds_topmost_opaque_cover() {
    let mut root = build_scene();
    let region = RectBounds::new(110.0, 110.0, 10.0, 10.0);

    // The black rect covers the region and nothing above it changed.
    assert_eq!(root.render_root(&region), RenderRoot::Clean);

    // Once it changes, painting starts from it rather than from the background.
    let group = root.child_mut(1).and_then(|n| n.as_group_mut()).unwrap();
    group
        .child_mut(0)
        .and_then(|n| n.as_rect_mut())
        .unwrap()
        .set_fill(Color::from_rgb8(0, 128, 0));
    assert_eq!(
        root.render_root(&region),
        RenderRoot::Path(NodePath::from_indices(vec![1, 0]))
    );

    // A region only the background covers starts from the background.
    let open_area = RectBounds::new(600.0, 50.0, 10.0, 10.0);
    assert_eq!(root.render_root(&open_area), RenderRoot::Clean);
}

#[test]
fn test_dirty_node_above_cover_prevents_clean_result() {
    let mut root = build_scene();
    let region = RectBounds::new(700.0, 500.0, 10.0, 10.0);
    root.add_child(RectNode::new(
        RectBounds::new(700.0, 500.0, 5.0, 5.0),
        Color::new(0.0, 0.0, 0.0, 0.5),
    ));

    assert_eq!(
        root.render_root(&region),
        RenderRoot::Path(NodePath::from_indices(vec![0]))
    );
}

#[test]
fn test_render_path_skips_nodes_below_the_root() {
    let root = build_scene();
    let mut g = RecordingGraphics::default();

    root.render_path(&mut g, &NodePath::from_indices(vec![1, 1]))
        .expect("path is valid");

    assert_eq!(g.fills.len(), 1);
    assert_eq!(g.fills[0].0, RectBounds::new(400.0, 400.0, 20.0, 20.0));
    assert_eq!(g.translation, (0.0, 0.0));

    let err = root
        .render_path(&mut g, &NodePath::from_indices(vec![7]))
        .unwrap_err();
    assert!(matches!(err, NodeFault::RenderFailed(_)));
}

#[test]
fn test_full_render_paints_in_z_order() {
    let root = build_scene();
    let mut g = RecordingGraphics::default();
    root.render(&mut g).expect("render succeeds");

    let painted: Vec<RectBounds> = g.fills.iter().map(|(b, _)| *b).collect();
    assert_eq!(
        painted,
        vec![
            scene_clip(),
            RectBounds::new(100.0, 100.0, 50.0, 50.0),
            RectBounds::new(400.0, 400.0, 20.0, 20.0),
        ]
    );
}
