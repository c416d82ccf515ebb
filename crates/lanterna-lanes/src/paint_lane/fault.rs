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

use lanterna_core::NodeFault;
use thiserror::Error;

/// Why a painter run was abandoned.
///
/// Faults stay inside the painter: [`Painter::paint`](super::Painter::paint)
/// reports them through [`PaintOutcome::Failed`] after scheduling a full
/// repaint, and never as an `Err`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintFault {
    /// The device refused to allocate a surface.
    #[error("Could not create a {width}x{height} surface")]
    SurfaceUnavailable {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },

    /// The locked surface offered no drawing context.
    #[error("Surface has no drawing context")]
    NoGraphics,

    /// Scene content failed while drawing.
    #[error("Scene content failed: {0}")]
    Node(#[from] NodeFault),

    /// A display step reported the surface stale.
    #[error("Display step '{step}' failed, surface is stale")]
    DisplayFailed {
        /// The failing step.
        step: &'static str,
    },

    /// Scene content panicked while drawing.
    #[error("Scene content panicked: {0}")]
    Panicked(String),
}

impl PaintFault {
    /// Returns `true` for faults reported by the device rather than by content.
    pub fn is_device_fault(&self) -> bool {
        matches!(
            self,
            PaintFault::SurfaceUnavailable { .. }
                | PaintFault::NoGraphics
                | PaintFault::DisplayFailed { .. }
        )
    }
}

/// Result of one [`Painter::paint`](super::Painter::paint) run.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOutcome {
    /// The snapshot or the device was not ready; nothing happened.
    Skipped {
        /// What failed validation.
        reason: &'static str,
    },
    /// Nothing changed since the last frame; no draw and no display.
    Clean,
    /// A frame was drawn and displayed. An upload the sink rejected still
    /// lands here with `accepted: false` but is not counted as a frame.
    Painted {
        /// Number of clipped passes, `0` for one full redraw.
        passes: usize,
        /// How the frame was displayed.
        displayed: super::Displayed,
    },
    /// The run was abandoned; the scene repaints fully next pulse.
    Failed(PaintFault),
}

impl PaintOutcome {
    /// Returns `true` if the scene must be scheduled again.
    pub fn needs_retry(&self) -> bool {
        matches!(self, PaintOutcome::Skipped { .. } | PaintOutcome::Failed(_))
    }
}
