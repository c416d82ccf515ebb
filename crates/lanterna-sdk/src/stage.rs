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

use crate::scene::Scene;
use lanterna_core::HostView;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A host window or texture that shows at most one scene at a time.
///
/// The stage only keeps a weak reference to its scene; dropping the last
/// [`Arc<Scene>`] leaves the stage empty.
#[derive(Debug)]
pub struct Stage {
    host: Arc<dyn HostView>,
    scene: Mutex<Weak<Scene>>,
}

impl Stage {
    /// Creates an empty stage over `host`.
    pub fn new(host: Arc<dyn HostView>) -> Self {
        Self {
            host,
            scene: Mutex::new(Weak::new()),
        }
    }

    /// The host view.
    pub fn host(&self) -> &Arc<dyn HostView> {
        &self.host
    }

    /// Shows `scene`, detaching the previous one. `None` empties the stage.
    ///
    /// A detached scene's surface is disposed and no render job is queued
    /// for it from then on.
    pub fn set_scene(&self, scene: Option<&Arc<Scene>>) {
        let mut current = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.upgrade() {
            if scene.is_some_and(|next| Arc::ptr_eq(next, &previous)) {
                return;
            }
            previous.detach_from(self.host.id());
        }
        *current = match scene {
            Some(next) => {
                next.attach(Arc::clone(&self.host));
                Arc::downgrade(next)
            }
            None => Weak::new(),
        };
    }

    /// The scene currently shown.
    pub fn scene(&self) -> Option<Arc<Scene>> {
        self.scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    /// Tells the scene that the host's size, scale or visibility changed.
    ///
    /// ## Returns
    /// `false` if the stage is empty or the scene was already scheduled.
    pub fn notify_host_changed(&self) -> bool {
        self.scene().is_some_and(|scene| scene.request_repaint())
    }

    /// Detaches the scene. Called on drop.
    pub fn close(&self) {
        self.set_scene(None);
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.close();
    }
}
