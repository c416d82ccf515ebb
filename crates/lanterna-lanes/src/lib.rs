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

//! # Lanterna Lanes
//!
//! The render-thread hot path of the painter:
//!
//! - [`dirty_lane`]: turns a scene's dirty walk into a bounded list of
//!   device-pixel repaint rectangles.
//! - [`paint_lane`]: the [`Painter`] state machine, the [`SurfaceManager`]
//!   owning a scene's surface, and the display strategies.

#![warn(missing_docs)]

pub mod dirty_lane;
pub mod paint_lane;

pub use dirty_lane::DirtyRegionTracker;
pub use paint_lane::{
    DisplayStrategy, Displayed, EmbeddedDisplay, PaintFault, PaintOutcome, PaintState, Painter,
    PresentingDisplay, SurfaceLease, SurfaceManager, UploadingDisplay,
};
