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

use crate::node::{add_clipped, RootSearch};
use lanterna_core::{
    Color, DirtyRegionContainer, DirtyStatus, Graphics, NodeFault, NodePath, RectBounds,
    RenderRoot, SceneNode,
};
use std::any::Any;

/// A filled, axis-aligned rectangle.
#[derive(Debug, Clone)]
pub struct RectNode {
    bounds: RectBounds,
    fill: Color,
    visible: bool,
    dirty: bool,
    painted: RectBounds,
}

impl RectNode {
    /// Creates a visible rectangle. It is dirty until its first painted pulse.
    pub fn new(bounds: RectBounds, fill: Color) -> Self {
        Self {
            bounds,
            fill,
            visible: true,
            dirty: true,
            painted: RectBounds::EMPTY,
        }
    }

    /// Current bounds, empty when invisible.
    pub fn bounds(&self) -> RectBounds {
        if self.visible {
            self.bounds
        } else {
            RectBounds::EMPTY
        }
    }

    /// Bounds at the last cleared pulse.
    pub fn painted_bounds(&self) -> RectBounds {
        self.painted
    }

    /// Moves or resizes the rectangle.
    pub fn set_bounds(&mut self, bounds: RectBounds) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.dirty = true;
        }
    }

    /// The fill color.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Changes the fill color.
    pub fn set_fill(&mut self, fill: Color) {
        if fill != self.fill {
            self.fill = fill;
            self.dirty = true;
        }
    }

    /// Returns `true` if the rectangle is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the rectangle.
    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    /// Returns `true` if the rectangle hides everything beneath it.
    pub fn is_opaque(&self) -> bool {
        self.visible && self.fill.is_opaque() && !self.bounds.is_empty()
    }

    pub(crate) fn forget_painted(&mut self) {
        self.painted = RectBounds::EMPTY;
        self.dirty = true;
    }

    pub(crate) fn search_render_root(&self, region: &RectBounds) -> Option<RootSearch> {
        (self.is_opaque() && self.bounds.contains(region)).then(|| RootSearch::at_self(!self.dirty))
    }
}

impl SceneNode for RectNode {
    fn render(&self, g: &mut dyn Graphics) -> Result<(), NodeFault> {
        if self.visible && !self.bounds.is_empty() {
            g.fill_rect(self.bounds, self.fill);
        }
        Ok(())
    }

    fn accumulate_dirty_regions(
        &self,
        clip: &RectBounds,
        regions: &mut DirtyRegionContainer,
    ) -> Result<DirtyStatus, NodeFault> {
        if !self.dirty {
            return Ok(DirtyStatus::Ok);
        }
        Ok(add_clipped(self.painted.union(&self.bounds()), clip, regions))
    }

    fn render_root(&self, region: &RectBounds) -> RenderRoot {
        self.search_render_root(region)
            .map_or(RenderRoot::Whole, RootSearch::into_render_root)
    }

    fn render_path(&self, g: &mut dyn Graphics, _path: &NodePath) -> Result<(), NodeFault> {
        self.render(g)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
        self.painted = self.bounds();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
