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

use crate::node::{add_clipped, Node, RootSearch};
use lanterna_core::{
    DirtyRegionContainer, DirtyStatus, Graphics, NodeFault, NodePath, RectBounds, RenderRoot,
    SceneNode,
};
use std::any::Any;

/// An ordered list of children sharing one translation.
///
/// Children are painted in index order, so the last child is on top.
#[derive(Debug, Clone)]
pub struct GroupNode {
    children: Vec<Node>,
    translate_x: f32,
    translate_y: f32,
    visible: bool,
    // Set when the group's own transform or visibility changed.
    self_dirty: bool,
    // Painted bounds of children removed since the last clear, local coordinates.
    removed: RectBounds,
    painted: RectBounds,
}

impl GroupNode {
    /// Creates an empty, visible, untranslated group.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            translate_x: 0.0,
            translate_y: 0.0,
            visible: true,
            self_dirty: true,
            removed: RectBounds::EMPTY,
            painted: RectBounds::EMPTY,
        }
    }

    /// Appends a child on top of the existing ones and returns its index.
    pub fn add_child(&mut self, child: impl Into<Node>) -> usize {
        let mut child = child.into();
        child.forget_painted();
        self.children.push(child);
        self.children.len() - 1
    }

    /// Inserts a child at `index`, shifting the ones above it.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert_child(&mut self, index: usize, child: impl Into<Node>) {
        let mut child = child.into();
        child.forget_painted();
        self.children.insert(index, child);
    }

    /// Removes the child at `index`. The area it covered at the last painted
    /// pulse is repainted on the next one.
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        if index >= self.children.len() {
            return None;
        }
        let child = self.children.remove(index);
        log::trace!("GroupNode: removed child {index}, {} left", self.children.len());
        self.removed = self.removed.union(&child.painted_bounds());
        Some(child)
    }

    /// The child at `index`.
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// The child at `index`, for mutation.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// All children, bottom first.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The current translation.
    pub fn translation(&self) -> (f32, f32) {
        (self.translate_x, self.translate_y)
    }

    /// Moves the whole group.
    pub fn set_translation(&mut self, x: f32, y: f32) {
        // NaN never compares equal, so an invalid value always marks dirty.
        if x != self.translate_x || y != self.translate_y {
            self.translate_x = x;
            self.translate_y = y;
            self.self_dirty = true;
        }
    }

    /// Returns `true` if the group is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the group.
    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            self.visible = visible;
            self.self_dirty = true;
        }
    }

    /// Union of visible children's bounds, in the parent's coordinates.
    pub fn bounds(&self) -> RectBounds {
        if !self.visible {
            return RectBounds::EMPTY;
        }
        self.local_bounds()
            .translated(self.translate_x, self.translate_y)
    }

    /// Bounds at the last cleared pulse, in the parent's coordinates.
    pub fn painted_bounds(&self) -> RectBounds {
        self.painted
    }

    fn local_bounds(&self) -> RectBounds {
        self.children
            .iter()
            .fold(RectBounds::EMPTY, |acc, child| acc.union(&child.bounds()))
    }

    fn check_transform(&self) -> Result<(), NodeFault> {
        if self.translate_x.is_finite() && self.translate_y.is_finite() {
            Ok(())
        } else {
            Err(NodeFault::InvalidTransform {
                detail: format!(
                    "group translate ({}, {})",
                    self.translate_x, self.translate_y
                ),
            })
        }
    }

    pub(crate) fn forget_painted(&mut self) {
        self.painted = RectBounds::EMPTY;
        self.self_dirty = true;
    }

    pub(crate) fn search_render_root(&self, region: &RectBounds) -> Option<RootSearch> {
        if !self.visible || self.check_transform().is_err() {
            return None;
        }
        let local = region.translated(-self.translate_x, -self.translate_y);
        let mut clean_above = !self.self_dirty && !self.removed.intersects(&local);
        for (index, child) in self.children.iter().enumerate().rev() {
            if let Some(found) = child.search_render_root(&local) {
                return Some(found.through(index, clean_above));
            }
            if child.is_dirty() && child.bounds().union(&child.painted_bounds()).intersects(&local) {
                clean_above = false;
            }
        }
        None
    }

    fn with_translation<F>(&self, g: &mut dyn Graphics, draw: F) -> Result<(), NodeFault>
    where
        F: FnOnce(&mut dyn Graphics) -> Result<(), NodeFault>,
    {
        self.check_transform()?;
        let (x, y) = g.translation();
        g.set_translation(x + self.translate_x, y + self.translate_y);
        let result = draw(&mut *g);
        g.set_translation(x, y);
        result
    }
}

impl Default for GroupNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for GroupNode {
    fn render(&self, g: &mut dyn Graphics) -> Result<(), NodeFault> {
        if !self.visible {
            return Ok(());
        }
        self.with_translation(g, |g| {
            self.children.iter().try_for_each(|child| child.render(g))
        })
    }

    fn accumulate_dirty_regions(
        &self,
        clip: &RectBounds,
        regions: &mut DirtyRegionContainer,
    ) -> Result<DirtyStatus, NodeFault> {
        if !self.is_dirty() || (!self.visible && !self.self_dirty) {
            return Ok(DirtyStatus::Ok);
        }
        self.check_transform()?;

        if self.self_dirty {
            return Ok(add_clipped(self.painted.union(&self.bounds()), clip, regions));
        }

        let status = add_clipped(
            self.removed.translated(self.translate_x, self.translate_y),
            clip,
            regions,
        );
        if status != DirtyStatus::Ok {
            return Ok(status);
        }

        let local_clip = clip.translated(-self.translate_x, -self.translate_y);
        let mut local = DirtyRegionContainer::new(regions.capacity(), regions.tolerance());
        for child in self.children.iter().filter(|c| c.is_dirty()) {
            let status = child.accumulate_dirty_regions(&local_clip, &mut local)?;
            if status != DirtyStatus::Ok {
                return Ok(status);
            }
        }
        for region in local.regions() {
            let status = regions.add(region.translated(self.translate_x, self.translate_y));
            if status != DirtyStatus::Ok {
                return Ok(status);
            }
        }
        Ok(DirtyStatus::Ok)
    }

    fn render_root(&self, region: &RectBounds) -> RenderRoot {
        self.search_render_root(region)
            .map_or(RenderRoot::Whole, RootSearch::into_render_root)
    }

    fn render_path(&self, g: &mut dyn Graphics, path: &NodePath) -> Result<(), NodeFault> {
        let Some((first, rest)) = path.split_first() else {
            return self.render(g);
        };
        if !self.visible {
            return Ok(());
        }
        let Some(start) = self.children.get(first) else {
            log::warn!(
                "GroupNode: render path index {first} out of {} children",
                self.children.len()
            );
            return Err(NodeFault::RenderFailed(format!(
                "render path index {first} out of {} children",
                self.children.len()
            )));
        };
        self.with_translation(g, |g| {
            start.render_path(g, &rest)?;
            self.children[first + 1..]
                .iter()
                .try_for_each(|child| child.render(g))
        })
    }

    fn is_dirty(&self) -> bool {
        self.self_dirty || !self.removed.is_empty() || self.children.iter().any(|c| c.is_dirty())
    }

    fn clear_dirty(&mut self) {
        for child in &mut self.children {
            child.clear_dirty();
        }
        self.self_dirty = false;
        self.removed = RectBounds::EMPTY;
        self.painted = self.bounds();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
