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

use crate::scene::{Scene, SceneDisplay};
use anyhow::{Context, Result};
use lanterna_control::{
    ProcessRenderLock, PulseRegistry, PulseReport, PulseScheduler, RenderLock, RenderQueue,
};
use lanterna_core::{GraphicsDevice, NotificationBus, PaintNotification, PainterSettings, SceneId};
use lanterna_infra::SoftwareDevice;
use lanterna_lanes::Painter;
use lanterna_telemetry::{PaintCounters, PaintCountersSnapshot, PulseLogger, PulsePhase};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Toolkit> = OnceLock::new();

/// Configures and starts a [`Toolkit`].
pub struct ToolkitBuilder {
    device: Option<Arc<dyn GraphicsDevice>>,
    lock: Option<Arc<dyn RenderLock>>,
    settings: Option<PainterSettings>,
    thread_name: String,
}

impl ToolkitBuilder {
    /// Creates a builder with the default collaborators: a software device,
    /// the process-wide render lock and default settings.
    pub fn new() -> Self {
        Self {
            device: None,
            lock: None,
            settings: None,
            thread_name: "lanterna-render".to_string(),
        }
    }

    /// Uses `device` for every scene surface.
    pub fn with_device(mut self, device: Arc<dyn GraphicsDevice>) -> Self {
        self.device = Some(device);
        self
    }

    /// Uses `lock` between the scene thread and the render thread.
    pub fn with_lock(mut self, lock: Arc<dyn RenderLock>) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Uses `settings` for every painter.
    pub fn with_settings(mut self, settings: PainterSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Names the render thread.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Validates the settings and spawns the render thread.
    pub fn build(self) -> Result<Toolkit> {
        let settings = self.settings.unwrap_or_default();
        settings.validate().context("Invalid painter settings")?;

        let device = self
            .device
            .unwrap_or_else(|| Arc::new(SoftwareDevice::default()));
        let lock = self
            .lock
            .unwrap_or_else(|| ProcessRenderLock::global() as Arc<dyn RenderLock>);
        let queue = Arc::new(
            RenderQueue::start_named(&self.thread_name).context("Failed to start the render thread")?,
        );
        let registry = Arc::new(PulseRegistry::new());
        let scheduler =
            PulseScheduler::new(Arc::clone(&registry), Arc::clone(&queue), settings.wait_for_render);

        log::info!(
            "Toolkit: started on device '{}' (dirty regions: {}, max {})",
            device.name(),
            settings.dirty_opts,
            settings.max_dirty_regions
        );
        Ok(Toolkit {
            device,
            lock,
            settings,
            queue,
            registry,
            scheduler,
            notifications: NotificationBus::new(),
            counters: Arc::new(PaintCounters::new()),
            pulse_logger: Arc::new(PulseLogger::new()),
        })
    }
}

impl Default for ToolkitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-level service tying scenes to the render thread.
///
/// Every method except the accessors must be called from the scene thread,
/// the single thread that mutates scene content and drives pulses.
pub struct Toolkit {
    device: Arc<dyn GraphicsDevice>,
    lock: Arc<dyn RenderLock>,
    settings: PainterSettings,
    queue: Arc<RenderQueue>,
    registry: Arc<PulseRegistry<Scene>>,
    scheduler: PulseScheduler<Scene>,
    notifications: NotificationBus<PaintNotification>,
    counters: Arc<PaintCounters>,
    pulse_logger: Arc<PulseLogger>,
}

impl Toolkit {
    /// Returns a builder.
    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::new()
    }

    /// The process-wide toolkit, started on first use.
    ///
    /// Settings come from the `LANTERNA_*` environment variables on top of
    /// the defaults. The toolkit lives until the process exits.
    pub fn global() -> Result<&'static Toolkit> {
        if let Some(toolkit) = GLOBAL.get() {
            return Ok(toolkit);
        }
        let settings = lanterna_infra::load_painter_settings(None)?;
        let toolkit = Toolkit::builder().with_settings(settings).build()?;
        // A concurrent first call may have won; its toolkit is kept.
        Ok(GLOBAL.get_or_init(|| toolkit))
    }

    /// Creates a detached scene. Attach it to a [`Stage`](crate::Stage) to render it.
    pub fn create_scene(&self, display: SceneDisplay) -> Arc<Scene> {
        self.create_scene_with_depth(display, false)
    }

    /// Creates a detached scene whose surfaces carry a depth buffer if `depth_buffer`.
    pub fn create_scene_with_depth(&self, display: SceneDisplay, depth_buffer: bool) -> Arc<Scene> {
        let painter = Painter::new(
            SceneId::next(),
            Arc::clone(&self.lock),
            Arc::clone(&self.device),
            display.into_strategy(),
            self.settings.clone(),
        )
        .with_depth_buffer(depth_buffer)
        .with_counters(Arc::clone(&self.counters))
        .with_notifications(self.notifications.sender());
        let scene = Scene::new(
            painter,
            Arc::clone(&self.registry),
            Arc::clone(&self.lock),
            Arc::clone(&self.pulse_logger),
        );
        log::debug!("Toolkit: created {}", scene.id());
        scene
    }

    /// Runs one pulse: syncs every dirty scene and queues one render job each.
    ///
    /// # Panics
    /// Panics if called from the render thread.
    pub fn pulse(&self) -> PulseReport {
        if self.queue.is_render_thread() {
            log::error!("Toolkit: pulse requested from the render thread");
            panic!("Toolkit::pulse must be called from the scene thread");
        }
        let report = self.scheduler.pulse();
        self.pulse_logger.record(PulsePhase::Wait, report.wait_time);
        self.pulse_logger.record(PulsePhase::Sync, report.sync_time);
        self.pulse_logger.finish_pulse();
        report
    }

    /// Blocks until every queued render job has run.
    pub fn wait_for_render(&self) {
        self.scheduler.wait_for_previous();
    }

    /// Delivers pending painter notifications to `handler` on the calling thread.
    ///
    /// ## Returns
    /// The number of notifications delivered.
    pub fn dispatch_notifications<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(PaintNotification),
    {
        let pending = self.notifications.drain();
        let count = pending.len();
        for notification in pending {
            handler(notification);
        }
        count
    }

    /// Schedules `scene` for the next pulse.
    ///
    /// ## Returns
    /// `false` if the scene is detached or already scheduled.
    pub fn request_next_pulse(&self, scene: &Arc<Scene>) -> bool {
        scene.request_repaint()
    }

    /// Returns `true` if a scene waits for the next pulse.
    pub fn pulse_pending(&self) -> bool {
        self.scheduler.pulse_pending()
    }

    /// Number of pulses run so far.
    pub fn pulse_count(&self) -> u64 {
        self.scheduler.pulse_count()
    }

    /// The settings every painter starts from.
    pub fn settings(&self) -> &PainterSettings {
        &self.settings
    }

    /// The graphics device.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// The render lock.
    pub fn lock(&self) -> &Arc<dyn RenderLock> {
        &self.lock
    }

    /// A copy of the paint counters of every scene.
    pub fn counters(&self) -> PaintCountersSnapshot {
        self.counters.snapshot()
    }

    /// Per-pulse timing collector.
    pub fn pulse_logger(&self) -> &PulseLogger {
        &self.pulse_logger
    }

    /// Runs the queued render jobs and stops the render thread.
    pub fn shutdown(self) {
        self.scheduler.wait_for_previous();
        let Toolkit {
            queue, scheduler, ..
        } = self;
        drop(scheduler);
        match Arc::try_unwrap(queue) {
            Ok(mut queue) => queue.shutdown(),
            Err(_) => log::warn!("Toolkit: render queue still shared, stopping on last drop"),
        }
        log::info!("Toolkit: shut down");
    }
}
