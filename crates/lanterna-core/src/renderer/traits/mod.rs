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

//! Defines the GPU-side contracts the painter drives.
//!
//! - [`GraphicsDevice`]: creates surfaces and reports device readiness.
//! - [`Surface`]: one render target with explicit lock, prepare, present and readback steps.
//! - [`Graphics`]: the clipped drawing context scene nodes render into.
//!
//! Device loss travels through `bool` return values only, never through errors.

mod device;
mod graphics;
mod surface;

pub use self::device::GraphicsDevice;
pub use self::graphics::Graphics;
pub use self::surface::{Surface, SurfaceDescriptor, SurfaceMode};
