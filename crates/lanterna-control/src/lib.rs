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

//! # Lanterna Control
//!
//! The synchronization backbone between the scene thread and the render thread:
//!
//! - [`RenderLock`]: the single process-wide mutual exclusion both threads share.
//! - [`RenderQueue`]: the dedicated render thread and its job queue.
//! - [`PulseRegistry`]: the coalescing set of scenes with pending changes.
//! - [`PulseScheduler`]: drains the registry once per pulse and submits one job per scene.

#![warn(missing_docs)]

pub mod lock;
pub mod queue;
pub mod registry;
pub mod scheduler;

pub use lock::{CountingLock, ProcessRenderLock, RenderLock, RenderLockGuard};
pub use queue::{panic_message, JobHandle, JobOutcome, RenderQueue};
pub use registry::PulseRegistry;
pub use scheduler::{PulseReport, PulseScheduler, PulseTarget};
