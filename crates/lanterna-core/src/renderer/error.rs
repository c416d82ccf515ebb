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

//! Errors reported by the rendering subsystem outside the painter boundary.
//!
//! Device loss is never an error: GPU collaborators report it through `bool`
//! return values and the painter recovers locally.

use std::fmt;

/// A high-level error raised while setting up or driving the render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The graphics device is not (or no longer) able to accept work.
    DeviceNotReady,
    /// The device could not allocate a surface of the requested size.
    SurfaceCreationFailed {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },
    /// The render thread has shut down and cannot accept jobs.
    RenderThreadStopped,
    /// A caller broke the locking or lifecycle discipline.
    ContractViolation(String),
    /// An unexpected internal error.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::DeviceNotReady => write!(f, "Graphics device is not ready"),
            RenderError::SurfaceCreationFailed { width, height } => {
                write!(f, "Failed to create a {width}x{height} surface")
            }
            RenderError::RenderThreadStopped => write!(f, "Render thread has stopped"),
            RenderError::ContractViolation(msg) => write!(f, "Contract violation: {msg}"),
            RenderError::Internal(msg) => write!(f, "Internal render error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
