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

//! The public-facing toolkit API of Lanterna.
//!
//! A [`Toolkit`] owns the render thread, the pulse registry and the graphics
//! device. Applications create [`Scene`]s from it, attach them to [`Stage`]s
//! wrapping a host view, mutate scene content on their own (scene) thread, and
//! call [`Toolkit::pulse`] once per frame tick.
//!
//! ```no_run
//! use lanterna_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let toolkit = Toolkit::builder().build()?;
//! let host = Arc::new(HeadlessView::new(800, 600));
//! let stage = Stage::new(host);
//! let scene = toolkit.create_scene(SceneDisplay::Presenting);
//! scene.set_root(GroupNode::new());
//! stage.set_scene(Some(&scene));
//!
//! toolkit.pulse();
//! toolkit.wait_for_render();
//! toolkit.dispatch_notifications(|n| log::info!("{n:?}"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod scene;
mod stage;
mod toolkit;

pub use scene::{Scene, SceneDisplay};
pub use stage::Stage;
pub use toolkit::{Toolkit, ToolkitBuilder};

/// Types most applications need.
pub mod prelude {
    pub use crate::{Scene, SceneDisplay, Stage, Toolkit, ToolkitBuilder};
    pub use lanterna_core::{
        Color, EmbeddedBuffer, HostView, PaintNotification, PainterSettings, RectBounds,
        SceneNode,
    };
    pub use lanterna_data::{GroupNode, Node, RectNode};
    pub use lanterna_infra::{HeadlessView, SoftwareDevice};
    pub use lanterna_telemetry::init_logging;
}
