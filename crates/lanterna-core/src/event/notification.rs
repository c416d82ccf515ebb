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

use crate::scene::SceneId;

/// Something the painter wants the scene thread to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintNotification {
    /// A frame reached the host.
    FramePainted {
        /// The painted scene.
        scene: SceneId,
        /// Frames painted by this scene's painter so far, this one included.
        frame: u64,
        /// Number of clipped passes, `0` for a full redraw.
        regions: usize,
    },
    /// The surface went stale and was disposed; the next pulse repaints fully.
    SurfaceLost {
        /// The affected scene.
        scene: SceneId,
    },
    /// The scene could not be painted for several pulses in a row.
    SceneUnrenderable {
        /// The affected scene.
        scene: SceneId,
        /// Number of consecutive failed pulses.
        consecutive_failures: u32,
    },
    /// A read-back frame was handed to the host's pixel sink.
    UploadReady {
        /// The uploading scene.
        scene: SceneId,
        /// Generation attached to the upload.
        generation: u64,
    },
}

impl PaintNotification {
    /// The scene the notification is about.
    pub fn scene(&self) -> SceneId {
        match self {
            PaintNotification::FramePainted { scene, .. }
            | PaintNotification::SurfaceLost { scene }
            | PaintNotification::SceneUnrenderable { scene, .. }
            | PaintNotification::UploadReady { scene, .. } => *scene,
        }
    }
}
