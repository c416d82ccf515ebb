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

//! # Lanterna Infra
//!
//! Concrete collaborators for the painter:
//!
//! - [`SoftwareDevice`]: a CPU rasterizer implementing the GPU contracts, with
//!   switches to inject device faults at every step.
//! - [`HeadlessView`]: a host with settable geometry and an upload mailbox.
//! - [`config`]: settings loading from files and the environment.

#![warn(missing_docs)]

pub mod config;
pub mod graphics;
pub mod platform;

pub use config::load_painter_settings;
pub use graphics::software::{
    DeviceEvent, FaultInjection, SoftwareDevice, SoftwareGraphics, SoftwareSurface,
};
pub use platform::headless::{HeadlessView, HeadlessViewBuilder};
