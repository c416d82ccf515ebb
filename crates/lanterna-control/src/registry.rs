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

//! The set of scenes waiting for the next pulse.

use lanterna_core::SceneId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

#[derive(Debug)]
struct Pending<T: ?Sized> {
    order: Vec<SceneId>,
    scenes: HashMap<SceneId, Weak<T>>,
}

impl<T: ?Sized> Default for Pending<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            scenes: HashMap::new(),
        }
    }
}

/// Coalesces repaint requests between pulses.
///
/// A scene appears at most once however often it is marked. Entries are weak
/// and keyed by [`SceneId`], so dropping a scene is enough to make it vanish
/// from the next drain.
#[derive(Debug)]
pub struct PulseRegistry<T: ?Sized> {
    pending: Mutex<Pending<T>>,
}

impl<T: ?Sized> PulseRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Records that `scene` needs a render job on the next pulse.
    ///
    /// ## Returns
    /// `true` if the scene was not already pending.
    pub fn mark_dirty(&self, id: SceneId, scene: &Arc<T>) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.scenes.contains_key(&id) {
            return false;
        }
        pending.scenes.insert(id, Arc::downgrade(scene));
        pending.order.push(id);
        log::trace!("PulseRegistry: {id} marked dirty");
        true
    }

    /// Forgets a pending scene.
    ///
    /// ## Returns
    /// `true` if the scene was pending.
    pub fn remove(&self, id: SceneId) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.scenes.remove(&id).is_none() {
            return false;
        }
        pending.order.retain(|pending_id| *pending_id != id);
        log::debug!("PulseRegistry: {id} removed");
        true
    }

    /// Returns `true` if the scene is pending.
    pub fn contains(&self, id: SceneId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .scenes
            .contains_key(&id)
    }

    /// Takes every pending scene, in marking order, and clears the set.
    ///
    /// The set is swapped out under the lock before any scene is upgraded, so
    /// a scene marked while the caller processes the result waits for the
    /// next drain. Scenes dropped since they were marked are skipped.
    pub fn drain(&self) -> Vec<Arc<T>> {
        let taken = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let Pending { order, mut scenes } = taken;
        order
            .into_iter()
            .filter_map(|id| {
                let scene = scenes.remove(&id)?.upgrade();
                if scene.is_none() {
                    log::debug!("PulseRegistry: {id} was dropped before the pulse");
                }
                scene
            })
            .collect()
    }

    /// Number of pending scenes, dropped ones included.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    /// Returns `true` if no scene is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for PulseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
