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

//! # Lanterna Core
//!
//! Foundational crate containing the value types, traits, and interface
//! contracts shared by the scene thread, the render thread, and the concrete
//! GPU and host backends.
//!
//! Nothing in this crate owns a thread or a GPU resource. It defines the
//! "what" of painting: geometry, the per-pulse [`SceneState`] snapshot, the
//! dirty region containers, and the collaborator traits ([`SceneNode`],
//! [`GraphicsDevice`], [`Surface`], [`HostView`]) that higher crates drive.

#![warn(missing_docs)]

pub mod event;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod utils;

pub use event::{NotificationBus, PaintNotification};
pub use math::{Color, PixelRect, RectBounds};
pub use platform::{EmbeddedBuffer, HostView, PixelBuffer, PixelSink, UploadSlot};
pub use renderer::{
    DirtyRegionContainer, DirtyRegionSet, DirtyStatus, Graphics, GraphicsDevice, RenderError,
    Surface, SurfaceDescriptor, SurfaceMode,
};
pub use scene::{NodeFault, NodePath, RenderRoot, SceneFlags, SceneId, SceneNode, SceneState};
pub use settings::{PainterSettings, SettingsError};
pub use utils::timer::Stopwatch;
