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

//! A retained scene and its render-thread painter.

use lanterna_control::{PulseRegistry, PulseTarget, RenderLock, RenderLockGuard};
use lanterna_core::{
    Color, EmbeddedBuffer, HostView, PixelSink, SceneFlags, SceneId, SceneNode, SceneState,
};
use lanterna_data::GroupNode;
use lanterna_lanes::{
    DisplayStrategy, EmbeddedDisplay, PaintOutcome, PaintState, Painter, PresentingDisplay,
    UploadingDisplay,
};
use lanterna_telemetry::{PulseLogger, PulsePhase, ScopedPhaseTimer};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// How a scene's frames reach its host.
#[derive(Clone)]
pub enum SceneDisplay {
    /// Onscreen surface presented to the host window.
    Presenting,
    /// Offscreen surface read back and handed to a pixel sink.
    Uploading(Arc<dyn PixelSink>),
    /// Offscreen surface copied into a buffer shared with an embedding host.
    Embedded(Arc<EmbeddedBuffer>),
}

impl SceneDisplay {
    pub(crate) fn into_strategy(self) -> Box<dyn DisplayStrategy> {
        match self {
            SceneDisplay::Presenting => Box::new(PresentingDisplay::new()),
            SceneDisplay::Uploading(sink) => Box::new(UploadingDisplay::new(sink)),
            SceneDisplay::Embedded(target) => Box::new(EmbeddedDisplay::new(target)),
        }
    }
}

impl fmt::Debug for SceneDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneDisplay::Presenting => f.write_str("Presenting"),
            SceneDisplay::Uploading(_) => f.write_str("Uploading"),
            SceneDisplay::Embedded(target) => {
                write!(f, "Embedded(frame {})", target.frame_id())
            }
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A node tree that can be copied for the render thread.
trait SceneContent: Send {
    fn node(&self) -> &dyn SceneNode;

    fn node_mut(&mut self) -> &mut dyn SceneNode;

    fn duplicate(&self) -> Box<dyn SceneContent>;
}

impl<N: SceneNode + Clone + 'static> SceneContent for N {
    fn node(&self) -> &dyn SceneNode {
        self
    }

    fn node_mut(&mut self) -> &mut dyn SceneNode {
        self
    }

    fn duplicate(&self) -> Box<dyn SceneContent> {
        Box::new(self.clone())
    }
}

/// A retained node tree painted by its own [`Painter`].
///
/// Content is mutated on the scene thread through [`with_root`](Self::with_root);
/// each mutation schedules the scene for the next pulse. The sync step copies
/// the tree for the render thread, so the painter works on that copy while the
/// scene thread keeps editing its own.
///
/// The live tree is only touched from the scene thread. Render-side locks are
/// always taken in the same order: render lock, rendered tree, painter.
pub struct Scene {
    id: SceneId,
    this: Weak<Scene>,
    registry: Arc<PulseRegistry<Scene>>,
    lock: Arc<dyn RenderLock>,
    flags: SceneFlags,
    live: Mutex<Box<dyn SceneContent>>,
    content_changed: AtomicBool,
    rendered: Mutex<Box<dyn SceneContent>>,
    pending_fill: Mutex<Option<Color>>,
    host: Mutex<Option<Arc<dyn HostView>>>,
    snapshot: Mutex<SceneState>,
    painter: Mutex<Painter>,
    pulse_logger: Arc<PulseLogger>,
}

impl Scene {
    pub(crate) fn new(
        painter: Painter,
        registry: Arc<PulseRegistry<Scene>>,
        lock: Arc<dyn RenderLock>,
        pulse_logger: Arc<PulseLogger>,
    ) -> Arc<Self> {
        let id = painter.scene_id();
        Arc::new_cyclic(|this| Self {
            id,
            this: this.clone(),
            registry,
            lock,
            flags: SceneFlags::new(),
            live: Mutex::new(Box::new(GroupNode::new())),
            content_changed: AtomicBool::new(false),
            rendered: Mutex::new(Box::new(GroupNode::new())),
            pending_fill: Mutex::new(None),
            host: Mutex::new(None),
            snapshot: Mutex::new(SceneState::detached(id)),
            painter: Mutex::new(painter),
            pulse_logger,
        })
    }

    /// The scene identity.
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// The repaint flags shared with the painter.
    pub fn flags(&self) -> &SceneFlags {
        &self.flags
    }

    /// Returns `true` while a stage shows this scene.
    pub fn is_attached(&self) -> bool {
        lock(&self.host).is_some()
    }

    /// The geometry frozen by the last sync step.
    pub fn snapshot(&self) -> SceneState {
        *lock(&self.snapshot)
    }

    /// Replaces the whole node tree and repaints it fully.
    pub fn set_root<N>(&self, root: N)
    where
        N: SceneNode + Clone + 'static,
    {
        *lock(&self.live) = Box::new(root);
        self.content_changed.store(true, Ordering::Release);
        self.flags.mark_entire_dirty();
        self.request_repaint();
    }

    /// Mutates the node tree and schedules a repaint.
    ///
    /// Never waits for the render thread: the change reaches the painter at
    /// the next sync step.
    pub fn with_root<R>(&self, mutate: impl FnOnce(&mut dyn SceneNode) -> R) -> R {
        let result = mutate(lock(&self.live).node_mut());
        self.content_changed.store(true, Ordering::Release);
        self.request_repaint();
        result
    }

    /// Like [`with_root`](Self::with_root) for a root of concrete type `N`.
    ///
    /// ## Returns
    /// `None`, without scheduling anything, if the root is not an `N`.
    pub fn with_root_as<N, R>(&self, mutate: impl FnOnce(&mut N) -> R) -> Option<R>
    where
        N: SceneNode + 'static,
    {
        let result = {
            let mut live = lock(&self.live);
            live.node_mut().as_any_mut().downcast_mut::<N>().map(mutate)
        };
        if result.is_some() {
            self.content_changed.store(true, Ordering::Release);
            self.request_repaint();
        }
        result
    }

    /// Sets the color a full redraw starts from. Repaints the whole scene.
    pub fn set_fill(&self, fill: Color) {
        *lock(&self.pending_fill) = Some(fill);
        self.flags.mark_entire_dirty();
        self.request_repaint();
    }

    /// Forces one full repaint on the next pulse.
    pub fn mark_entire_dirty(&self) {
        self.flags.mark_entire_dirty();
        self.request_repaint();
    }

    /// Asks for the surface to be displayed again even if nothing changed.
    pub fn request_present(&self) {
        self.flags.request_present();
        self.request_repaint();
    }

    /// Schedules the scene for the next pulse.
    ///
    /// ## Returns
    /// `false` if the scene is detached or already scheduled.
    pub fn request_repaint(&self) -> bool {
        if !self.is_attached() {
            return false;
        }
        match self.this.upgrade() {
            Some(this) => self.registry.mark_dirty(self.id, &this),
            None => false,
        }
    }

    /// State of the painter. `Idle` unless a run is in progress.
    pub fn paint_state(&self) -> PaintState {
        lock(&self.painter).state()
    }

    /// Frames that reached the host.
    pub fn frames_painted(&self) -> u64 {
        lock(&self.painter).frames_painted()
    }

    /// Pulses that failed in a row.
    pub fn consecutive_failures(&self) -> u32 {
        lock(&self.painter).consecutive_failures()
    }

    /// Number of surfaces created for this scene so far.
    pub fn surfaces_created(&self) -> u64 {
        lock(&self.painter).surfaces().surfaces_created()
    }

    /// Hands the scene thread's edits to the render side. Caller holds the render lock.
    fn publish_content(&self) {
        if !self.content_changed.swap(false, Ordering::AcqRel) {
            return;
        }
        let mut live = lock(&self.live);
        let mut rendered = lock(&self.rendered);
        if rendered.node().is_dirty() {
            // The previous copy was never painted; its dirty regions go with it.
            self.flags.mark_entire_dirty();
        }
        *rendered = live.duplicate();
        live.node_mut().clear_dirty();
        log::trace!("Scene[{}]: content published", self.id);
    }

    pub(crate) fn attach(&self, host: Arc<dyn HostView>) {
        log::debug!("Scene[{}]: attached to host {}", self.id, host.id());
        *lock(&self.host) = Some(host);
        self.flags.mark_entire_dirty();
        self.request_repaint();
    }

    /// Detaches the scene if `host_id` is still its host.
    pub(crate) fn detach_from(&self, host_id: u64) {
        {
            let mut host = lock(&self.host);
            if host.as_ref().map(|h| h.id()) != Some(host_id) {
                return;
            }
            *host = None;
        }
        self.registry.remove(self.id);
        let _guard = RenderLockGuard::new(self.lock.as_ref());
        *lock(&self.snapshot) = SceneState::detached(self.id);
        lock(&self.painter).dispose_surface();
        log::debug!("Scene[{}]: detached", self.id);
    }
}

impl PulseTarget for Scene {
    fn scene_id(&self) -> SceneId {
        self.id
    }

    fn sync(&self) -> bool {
        let guard = RenderLockGuard::new(self.lock.as_ref());
        let Some(host) = lock(&self.host).clone() else {
            return false;
        };
        *lock(&self.snapshot) = guard.capture(self.id, host.as_ref());
        self.publish_content();
        self.flags.set_frame_pending(true);
        true
    }

    fn render(&self) {
        let _timer = ScopedPhaseTimer::new(&self.pulse_logger, PulsePhase::Paint(self.id));
        let outcome = {
            let _guard = RenderLockGuard::new(self.lock.as_ref());
            let snapshot = *lock(&self.snapshot);
            let mut rendered = lock(&self.rendered);
            let mut painter = lock(&self.painter);
            if let Some(fill) = lock(&self.pending_fill).take() {
                let mut settings = painter.settings().clone();
                settings.clear_color = fill;
                painter.set_settings(settings);
            }
            painter.paint(&snapshot, rendered.node_mut(), &self.flags)
        };
        self.flags.set_frame_pending(false);

        match &outcome {
            PaintOutcome::Painted { passes, .. } => {
                log::trace!("Scene[{}]: painted with {passes} pass(es)", self.id)
            }
            PaintOutcome::Clean => log::trace!("Scene[{}]: nothing to paint", self.id),
            _ => {}
        }
        if outcome.needs_retry() && self.request_repaint() {
            log::trace!("Scene[{}]: scheduled again after {outcome:?}", self.id);
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}
