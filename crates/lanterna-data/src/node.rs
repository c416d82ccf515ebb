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

use crate::group::GroupNode;
use crate::rect::RectNode;
use lanterna_core::{
    DirtyRegionContainer, DirtyStatus, Graphics, NodeFault, NodePath, RectBounds, RenderRoot,
    SceneNode,
};
use std::any::Any;

/// A child of a [`GroupNode`].
#[derive(Debug, Clone)]
pub enum Node {
    /// A filled rectangle.
    Rect(RectNode),
    /// A translated group of children.
    Group(GroupNode),
}

/// An occluder found while searching for a render root.
#[derive(Debug)]
pub(crate) struct RootSearch {
    /// Child indices from the occluder up to the searching node, innermost first.
    reversed_path: Vec<usize>,
    /// Whether the occluder and everything painted above it are clean.
    pub(crate) clean: bool,
}

impl RootSearch {
    pub(crate) fn at_self(clean: bool) -> Self {
        Self {
            reversed_path: Vec::new(),
            clean,
        }
    }

    pub(crate) fn through(mut self, index: usize, clean_above: bool) -> Self {
        self.reversed_path.push(index);
        self.clean &= clean_above;
        self
    }

    pub(crate) fn into_render_root(self) -> RenderRoot {
        if self.clean {
            return RenderRoot::Clean;
        }
        let mut indices = self.reversed_path;
        indices.reverse();
        RenderRoot::Path(NodePath::from_indices(indices))
    }
}

/// Adds `region` (parent coordinates) clipped to `clip`.
pub(crate) fn add_clipped(
    region: RectBounds,
    clip: &RectBounds,
    regions: &mut DirtyRegionContainer,
) -> DirtyStatus {
    let clipped = region.intersection(clip);
    if clipped.is_empty() {
        return DirtyStatus::Ok;
    }
    if region.contains(clip) {
        return DirtyStatus::ContainsClip;
    }
    regions.add(clipped)
}

impl Node {
    /// Current bounds in the parent's coordinates, empty when invisible.
    pub fn bounds(&self) -> RectBounds {
        match self {
            Node::Rect(rect) => rect.bounds(),
            Node::Group(group) => group.bounds(),
        }
    }

    /// Bounds at the last cleared pulse, in the parent's coordinates.
    pub fn painted_bounds(&self) -> RectBounds {
        match self {
            Node::Rect(rect) => rect.painted_bounds(),
            Node::Group(group) => group.painted_bounds(),
        }
    }

    /// Returns the rectangle, if this is one.
    pub fn as_rect(&self) -> Option<&RectNode> {
        match self {
            Node::Rect(rect) => Some(rect),
            Node::Group(_) => None,
        }
    }

    /// Returns the rectangle mutably, if this is one.
    pub fn as_rect_mut(&mut self) -> Option<&mut RectNode> {
        match self {
            Node::Rect(rect) => Some(rect),
            Node::Group(_) => None,
        }
    }

    /// Returns the group, if this is one.
    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Node::Group(group) => Some(group),
            Node::Rect(_) => None,
        }
    }

    /// Returns the group mutably, if this is one.
    pub fn as_group_mut(&mut self) -> Option<&mut GroupNode> {
        match self {
            Node::Group(group) => Some(group),
            Node::Rect(_) => None,
        }
    }

    pub(crate) fn forget_painted(&mut self) {
        match self {
            Node::Rect(rect) => rect.forget_painted(),
            Node::Group(group) => group.forget_painted(),
        }
    }

    pub(crate) fn search_render_root(&self, region: &RectBounds) -> Option<RootSearch> {
        match self {
            Node::Rect(rect) => rect.search_render_root(region),
            Node::Group(group) => group.search_render_root(region),
        }
    }
}

impl From<RectNode> for Node {
    fn from(rect: RectNode) -> Self {
        Node::Rect(rect)
    }
}

impl From<GroupNode> for Node {
    fn from(group: GroupNode) -> Self {
        Node::Group(group)
    }
}

impl SceneNode for Node {
    fn render(&self, g: &mut dyn Graphics) -> Result<(), NodeFault> {
        match self {
            Node::Rect(rect) => rect.render(g),
            Node::Group(group) => group.render(g),
        }
    }

    fn accumulate_dirty_regions(
        &self,
        clip: &RectBounds,
        regions: &mut DirtyRegionContainer,
    ) -> Result<DirtyStatus, NodeFault> {
        match self {
            Node::Rect(rect) => rect.accumulate_dirty_regions(clip, regions),
            Node::Group(group) => group.accumulate_dirty_regions(clip, regions),
        }
    }

    fn render_root(&self, region: &RectBounds) -> RenderRoot {
        match self {
            Node::Rect(rect) => rect.render_root(region),
            Node::Group(group) => group.render_root(region),
        }
    }

    fn render_path(&self, g: &mut dyn Graphics, path: &NodePath) -> Result<(), NodeFault> {
        match self {
            Node::Rect(rect) => rect.render_path(g, path),
            Node::Group(group) => group.render_path(g, path),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            Node::Rect(rect) => rect.is_dirty(),
            Node::Group(group) => group.is_dirty(),
        }
    }

    fn clear_dirty(&mut self) {
        match self {
            Node::Rect(rect) => rect.clear_dirty(),
            Node::Group(group) => group.clear_dirty(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
