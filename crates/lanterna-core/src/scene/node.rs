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

//! The contract through which the painter talks to retained scene content.
//!
//! The painter never inspects node geometry. It asks the root node to draw
//! itself, to report the bounds of whatever changed since the last pulse, and
//! optionally to name the smallest subtree that must be redrawn for a region.

use crate::math::RectBounds;
use crate::renderer::{DirtyRegionContainer, DirtyStatus, Graphics};
use std::any::Any;
use std::fmt;

/// A fault raised by scene content during a dirty walk or a draw pass.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeFault {
    /// A node carries a transform that cannot map its bounds (NaN, infinite).
    InvalidTransform {
        /// Description of the offending node and value.
        detail: String,
    },
    /// A node failed while drawing.
    RenderFailed(String),
}

impl fmt::Display for NodeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeFault::InvalidTransform { detail } => {
                write!(f, "Invalid node transform: {detail}")
            }
            NodeFault::RenderFailed(msg) => write!(f, "Node render failed: {msg}"),
        }
    }
}

impl std::error::Error for NodeFault {}

/// Child indices leading from a root node down to a descendant.
///
/// An empty path designates the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path designating the root node.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from child indices, outermost first.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns a new path extended by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Returns the child indices, outermost first.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns `true` if the path designates the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits off the first index, returning it and the remaining path.
    pub fn split_first(&self) -> Option<(usize, NodePath)> {
        self.0
            .split_first()
            .map(|(first, rest)| (*first, NodePath(rest.to_vec())))
    }
}

/// Result of asking a node which subtree must be redrawn for a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderRoot {
    /// An opaque, clean node already covers the region. Nothing to draw.
    Clean,
    /// Draw starting at the node at this path, then every sibling painted
    /// above it in z-order. Ancestors still apply their transforms.
    Path(NodePath),
    /// No culling is possible; draw the whole tree.
    Whole,
}

/// Retained scene content as seen by the painter.
///
/// Implementations are owned by a scene and mutated only on the scene thread.
/// The render thread paints a copy taken at the sync step and calls these
/// methods on it while it holds the render lock.
pub trait SceneNode: Send {
    /// Draws the node and its descendants unconditionally.
    fn render(&self, g: &mut dyn Graphics) -> Result<(), NodeFault>;

    /// Adds the logical bounds of everything that changed since the last
    /// cleared pulse to `regions`, clipped to `clip`.
    ///
    /// Returns [`DirtyStatus::ContainsClip`] when a changed area covers the
    /// whole clip, and [`DirtyStatus::TooComplex`] when the container
    /// overflowed. The walk only descends into dirty subtrees.
    fn accumulate_dirty_regions(
        &self,
        clip: &RectBounds,
        regions: &mut DirtyRegionContainer,
    ) -> Result<DirtyStatus, NodeFault>;

    /// Names the subtree that must be redrawn to refresh `region`.
    fn render_root(&self, _region: &RectBounds) -> RenderRoot {
        RenderRoot::Whole
    }

    /// Draws the subtree designated by `path` and everything above it.
    fn render_path(&self, g: &mut dyn Graphics, _path: &NodePath) -> Result<(), NodeFault> {
        self.render(g)
    }

    /// Returns `true` if the node or any descendant changed since the last clear.
    fn is_dirty(&self) -> bool;

    /// Resets dirty tracking for the whole subtree after a painted pulse.
    fn clear_dirty(&mut self);

    /// Allows downcasting to the concrete node type.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete node type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
