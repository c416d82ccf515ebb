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

//! Paint lane - the render-thread side of a pulse.
//!
//! A [`Painter`] runs once per dirty scene per pulse. It validates the
//! scene snapshot, leases the scene's surface from its [`SurfaceManager`],
//! draws the dirty regions, and hands the result to a [`DisplayStrategy`]:
//! presenting to a window, uploading to a host, or writing into an embedded
//! buffer.

mod display;
mod fault;
mod painter;
mod state;
mod surface_manager;

pub use display::*;
pub use fault::*;
pub use painter::*;
pub use state::*;
pub use surface_manager::*;
