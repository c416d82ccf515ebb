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

//! # Lanterna Data
//!
//! Retained scene content: a minimal node tree that implements the
//! [`SceneNode`](lanterna_core::SceneNode) contract.
//!
//! Nodes track the bounds they were last painted at, so a change reports
//! both where the content was and where it is now. Groups remember the
//! painted bounds of removed children until the next cleared pulse.

#![warn(missing_docs)]

mod group;
mod node;
mod rect;

pub use self::group::GroupNode;
pub use self::node::Node;
pub use self::rect::RectNode;
