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

use super::{DisplayStrategy, Displayed, PaintFault, PaintOutcome, PaintState, SurfaceManager};
use crate::dirty_lane::DirtyRegionTracker;
use lanterna_control::{panic_message, RenderLock, RenderLockGuard};
use lanterna_core::{
    Color, DirtyRegionSet, DirtyStatus, Graphics, GraphicsDevice, PaintNotification,
    PainterSettings, RenderRoot, SceneFlags, SceneId, SceneNode, SceneState,
};
use lanterna_telemetry::PaintCounters;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// The render-thread state machine painting one scene.
///
/// A scene owns exactly one painter. Every [`paint`](Self::paint) call runs
/// `Idle → Validating → SurfaceReady → Painting → Displaying → Idle` while
/// holding the render lock. Any failing step moves to
/// [`PaintState::Invalid`], marks the scene entirely dirty and returns to
/// `Idle`; faults never propagate to the caller.
#[derive(Debug)]
pub struct Painter {
    scene: SceneId,
    lock: Arc<dyn RenderLock>,
    settings: PainterSettings,
    tracker: DirtyRegionTracker,
    surfaces: SurfaceManager,
    display: Box<dyn DisplayStrategy>,
    counters: Arc<PaintCounters>,
    notifications: Option<flume::Sender<PaintNotification>>,
    state: PaintState,
    frames: u64,
    consecutive_failures: u32,
}

impl Painter {
    /// Creates a painter.
    ///
    /// ## Arguments
    /// * `scene` - The scene this painter draws, used in logs and notifications.
    /// * `lock` - The lock shared with the scene thread's sync step.
    /// * `device` - Creates the scene's surfaces.
    /// * `display` - The variant-specific Displaying step.
    /// * `settings` - Repaint tuning.
    pub fn new(
        scene: SceneId,
        lock: Arc<dyn RenderLock>,
        device: Arc<dyn GraphicsDevice>,
        display: Box<dyn DisplayStrategy>,
        settings: PainterSettings,
    ) -> Self {
        log::debug!(
            "Painter[{scene}]: created with {} display on '{}'",
            display.name(),
            device.name()
        );
        Self {
            scene,
            lock,
            tracker: DirtyRegionTracker::new(&settings),
            surfaces: SurfaceManager::new(device, display.surface_mode(), false),
            settings,
            display,
            counters: Arc::new(PaintCounters::new()),
            notifications: None,
            state: PaintState::Idle,
            frames: 0,
            consecutive_failures: 0,
        }
    }

    /// Requests a depth buffer on the surfaces this painter creates.
    pub fn with_depth_buffer(mut self, depth_buffer: bool) -> Self {
        let device = Arc::clone(self.surfaces.device());
        self.surfaces = SurfaceManager::new(device, self.display.surface_mode(), depth_buffer);
        self
    }

    /// Shares counters with other painters.
    pub fn with_counters(mut self, counters: Arc<PaintCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Posts notifications for the scene thread through `sender`.
    pub fn with_notifications(mut self, sender: flume::Sender<PaintNotification>) -> Self {
        self.notifications = Some(sender);
        self
    }

    /// The painted scene.
    pub fn scene_id(&self) -> SceneId {
        self.scene
    }

    /// Current state. `Idle` whenever no run is in progress.
    pub fn state(&self) -> PaintState {
        self.state
    }

    /// Active settings.
    pub fn settings(&self) -> &PainterSettings {
        &self.settings
    }

    /// Replaces the settings from the next run on.
    pub fn set_settings(&mut self, settings: PainterSettings) {
        self.tracker.configure(&settings);
        self.settings = settings;
    }

    /// Frames that reached the host.
    pub fn frames_painted(&self) -> u64 {
        self.frames
    }

    /// Runs that failed in a row since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// The surface owner.
    pub fn surfaces(&self) -> &SurfaceManager {
        &self.surfaces
    }

    /// The Displaying step.
    pub fn display(&self) -> &dyn DisplayStrategy {
        self.display.as_ref()
    }

    /// Paints one pulse of the scene.
    ///
    /// ## Arguments
    /// * `snapshot` - Geometry captured during the last sync step.
    /// * `root` - The scene content.
    /// * `flags` - The scene's repaint flags.
    ///
    /// ## Returns
    /// What happened. [`PaintOutcome::needs_retry`] tells the caller to
    /// schedule the scene again.
    pub fn paint(
        &mut self,
        snapshot: &SceneState,
        root: &mut dyn SceneNode,
        flags: &SceneFlags,
    ) -> PaintOutcome {
        let lock = Arc::clone(&self.lock);
        let _guard = RenderLockGuard::new(lock.as_ref());

        self.state.advance(PaintState::Validating);
        if let Some(reason) = self.validate(snapshot) {
            log::debug!("Painter[{}]: pulse skipped, {reason}", self.scene);
            self.counters.record_skip();
            self.state.advance(PaintState::Idle);
            return PaintOutcome::Skipped { reason };
        }

        let mut changes_consumed = false;
        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run(snapshot, &*root, flags, &mut changes_consumed)
        }));
        let result = run.unwrap_or_else(|payload| {
            Err(PaintFault::Panicked(panic_message(payload.as_ref())))
        });

        if changes_consumed {
            root.clear_dirty();
        }

        match result {
            Ok(outcome) => {
                self.consecutive_failures = 0;
                self.state.advance(PaintState::Idle);
                outcome
            }
            Err(fault) => self.abandon(fault, flags),
        }
    }

    /// Disposes the scene's surface. Used when the scene is detached.
    pub fn dispose_surface(&mut self) {
        let lock = Arc::clone(&self.lock);
        let _guard = RenderLockGuard::new(lock.as_ref());
        self.surfaces.dispose();
    }

    fn validate(&self, snapshot: &SceneState) -> Option<&'static str> {
        if !snapshot.handle_valid {
            Some("host handle is not valid")
        } else if snapshot.width == 0 || snapshot.height == 0 {
            Some("host has an empty size")
        } else if snapshot.minimized || !snapshot.visible {
            Some("host is hidden")
        } else if !(snapshot.pixel_scale.is_finite() && snapshot.pixel_scale > 0.0) {
            Some("pixel scale is not positive")
        } else if !self.surfaces.device().is_device_ready() {
            Some("device is not ready")
        } else {
            None
        }
    }

    fn run(
        &mut self,
        snapshot: &SceneState,
        root: &dyn SceneNode,
        flags: &SceneFlags,
        changes_consumed: &mut bool,
    ) -> Result<PaintOutcome, PaintFault> {
        let Painter {
            scene,
            settings,
            tracker,
            surfaces,
            display,
            counters,
            notifications,
            state,
            frames,
            ..
        } = self;
        let scene = *scene;

        state.advance(PaintState::SurfaceReady);
        let (width, height) = snapshot.surface_size();
        let Some(mut lease) = surfaces.acquire(width, height) else {
            return Err(PaintFault::SurfaceUnavailable { width, height });
        };
        if lease.replaced_previous() {
            counters.record_surface_recreation();
        }

        let full = lease.was_recreated() || flags.is_entire_dirty() || !settings.dirty_opts;
        let dirty = if full {
            DirtyRegionSet::full_redraw(DirtyStatus::ContainsClip)
        } else {
            tracker.accumulate(root, snapshot, settings)
        };
        *changes_consumed = true;

        let present_requested = flags.take_present_request();
        if dirty.is_clean() && !present_requested {
            log::trace!("Painter[{scene}]: nothing to repaint");
            return Ok(PaintOutcome::Clean);
        }

        let passes = if dirty.is_clean() {
            None
        } else {
            state.advance(PaintState::Painting);
            let drawn = match lease.surface().graphics() {
                Some(g) => draw(g, root, &dirty, snapshot, settings, scene),
                None => Err(PaintFault::NoGraphics),
            };
            match drawn {
                Ok(passes) => Some(passes),
                Err(fault) => {
                    if fault == PaintFault::NoGraphics {
                        lease.invalidate();
                    }
                    return Err(fault);
                }
            }
        };

        state.advance(PaintState::Displaying);
        let dirty_area = if dirty.requires_full_redraw() {
            None
        } else {
            dirty.bounds()
        };
        if !display.prepare_display(lease.surface(), dirty_area) {
            lease.invalidate();
            return Err(PaintFault::DisplayFailed { step: "prepare" });
        }
        let displayed = match display.finalize_display(lease.surface()) {
            Ok(displayed) => displayed,
            Err(fault) => {
                lease.invalidate();
                return Err(fault);
            }
        };
        drop(lease);

        flags.clear_entire_dirty();
        let passes = passes.unwrap_or(0);
        if let Displayed::Uploaded {
            generation,
            accepted: false,
        } = displayed
        {
            log::debug!("Painter[{scene}]: sink rejected upload {generation}, no frame counted");
            counters.record_uploads_dropped(1);
            return Ok(PaintOutcome::Painted { passes, displayed });
        }
        *frames += 1;
        counters.record_frame(passes);
        post(
            notifications,
            PaintNotification::FramePainted {
                scene,
                frame: *frames,
                regions: passes,
            },
        );
        if let Displayed::Uploaded { generation, .. } = displayed {
            post(notifications, PaintNotification::UploadReady { scene, generation });
        }
        log::trace!(
            "Painter[{scene}]: frame {} displayed ({:?}, {passes} clipped pass(es))",
            frames,
            displayed
        );

        Ok(PaintOutcome::Painted { passes, displayed })
    }

    fn abandon(&mut self, fault: PaintFault, flags: &SceneFlags) -> PaintOutcome {
        self.state.advance(PaintState::Invalid);
        flags.mark_entire_dirty();
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        if fault.is_device_fault() {
            log::warn!(
                "Painter[{}]: {fault}; repainting fully next pulse",
                self.scene
            );
            self.counters.record_device_fault();
            if matches!(fault, PaintFault::DisplayFailed { .. } | PaintFault::NoGraphics) {
                post(
                    &self.notifications,
                    PaintNotification::SurfaceLost { scene: self.scene },
                );
            }
        } else {
            log::error!("Painter[{}]: {fault}", self.scene);
        }

        let warn_after = self.settings.unrenderable_warn_after;
        if warn_after > 0 && self.consecutive_failures % warn_after == 0 {
            log::warn!(
                "Painter[{}]: scene unrenderable for {} consecutive pulses",
                self.scene,
                self.consecutive_failures
            );
            post(
                &self.notifications,
                PaintNotification::SceneUnrenderable {
                    scene: self.scene,
                    consecutive_failures: self.consecutive_failures,
                },
            );
        }

        self.state.advance(PaintState::Idle);
        PaintOutcome::Failed(fault)
    }
}

/// Issues the draw passes of one run.
///
/// ## Returns
/// The number of clipped passes, `0` for one unclipped full redraw.
fn draw(
    g: &mut dyn Graphics,
    root: &dyn SceneNode,
    dirty: &DirtyRegionSet,
    snapshot: &SceneState,
    settings: &PainterSettings,
    scene: SceneId,
) -> Result<usize, PaintFault> {
    g.set_pixel_scale(snapshot.pixel_scale);
    g.set_translation(0.0, 0.0);

    if dirty.requires_full_redraw() {
        log::trace!("Painter[{scene}]: full redraw ({:?})", dirty.status);
        g.set_clip_rect(None);
        g.clear(settings.clear_color);
        root.render(g)?;
        return Ok(0);
    }

    for region in &dirty.regions {
        log::trace!("Painter[{scene}]: clipped pass {region:?}");
        g.set_clip_rect(Some(*region));
        g.set_translation(0.0, 0.0);
        let logical = region.to_bounds().scaled(1.0 / snapshot.pixel_scale);
        let render_root = if settings.occlusion_culling {
            root.render_root(&logical)
        } else {
            RenderRoot::Whole
        };
        match render_root {
            RenderRoot::Clean => {
                log::trace!("Painter[{scene}]: region {region:?} is covered, skipped");
            }
            RenderRoot::Path(path) => root.render_path(g, &path)?,
            RenderRoot::Whole => {
                g.clear(settings.clear_color);
                root.render(g)?;
            }
        }
        if settings.show_dirty_regions {
            g.stroke_rect(*region, Color::DIRTY_OVERLAY);
        }
    }
    g.set_clip_rect(None);
    Ok(dirty.regions.len())
}

fn post(sender: &Option<flume::Sender<PaintNotification>>, notification: PaintNotification) {
    if let Some(sender) = sender {
        // The toolkit may have shut down and dropped the receiver.
        let _ = sender.send(notification);
    }
}
