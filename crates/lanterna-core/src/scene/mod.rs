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

//! Scene-level contracts: identity, cross-thread flags, the per-pulse
//! snapshot, and the retained node interface the painter renders through.

pub mod flags;
pub mod node;
pub mod snapshot;

pub use self::flags::SceneFlags;
pub use self::node::{NodeFault, NodePath, RenderRoot, SceneNode};
pub use self::snapshot::{SceneId, SceneState};
