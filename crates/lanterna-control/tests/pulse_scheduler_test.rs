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

use lanterna_control::{
    CountingLock, PulseRegistry, PulseScheduler, PulseTarget, RenderLock, RenderLockGuard,
    RenderQueue,
};
use lanterna_core::SceneId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

// --- A SCENE FAKE RECORDING WHERE EACH STEP RAN ---
#[derive(Debug)]
struct FakeScene {
    id: SceneId,
    lock: Arc<CountingLock>,
    attached: AtomicBool,
    syncs: AtomicUsize,
    renders: AtomicUsize,
    render_threads: Mutex<Vec<ThreadId>>,
}

impl FakeScene {
    fn new(lock: &Arc<CountingLock>) -> Arc<Self> {
        Arc::new(Self {
            id: SceneId::next(),
            lock: Arc::clone(lock),
            attached: AtomicBool::new(true),
            syncs: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
            render_threads: Mutex::new(Vec::new()),
        })
    }
}

impl PulseTarget for FakeScene {
    fn scene_id(&self) -> SceneId {
        self.id
    }

    fn sync(&self) -> bool {
        let _guard = RenderLockGuard::new(self.lock.as_ref());
        self.syncs.fetch_add(1, Ordering::SeqCst);
        self.attached.load(Ordering::SeqCst)
    }

    fn render(&self) {
        let _guard = RenderLockGuard::new(self.lock.as_ref());
        assert!(self.lock.is_held_by_current_thread());
        self.renders.fetch_add(1, Ordering::SeqCst);
        self.render_threads
            .lock()
            .unwrap()
            .push(thread::current().id());
    }
}

fn scheduler() -> (
    PulseScheduler<FakeScene>,
    Arc<PulseRegistry<FakeScene>>,
    Arc<CountingLock>,
) {
    let registry = Arc::new(PulseRegistry::new());
    let queue = Arc::new(RenderQueue::start().expect("render thread should spawn"));
    let scheduler = PulseScheduler::new(Arc::clone(&registry), queue, true);
    (scheduler, registry, Arc::new(CountingLock::new()))
}

#[test]
fn test_repeated_marks_produce_one_job() {
    // --- 1. ARRANGE ---
    let (scheduler, registry, lock) = scheduler();
    let scene = FakeScene::new(&lock);
    for _ in 0..5 {
        registry.mark_dirty(scene.id, &scene);
    }

    // --- 2. ACT ---
    let report = scheduler.pulse();
    scheduler.wait_for_previous();

    // --- 3. ASSERT ---
    assert_eq!(report.drained, 1);
    assert_eq!(report.submitted, 1);
    assert_eq!(scene.syncs.load(Ordering::SeqCst), 1);
    assert_eq!(scene.renders.load(Ordering::SeqCst), 1);
    assert!(lock.is_balanced());
    assert!(!scheduler.pulse_pending());
}

#[test]
fn test_detach_before_drain_schedules_nothing() {
    // --- 1. ARRANGE ---
    let (scheduler, registry, lock) = scheduler();
    let scene = FakeScene::new(&lock);
    registry.mark_dirty(scene.id, &scene);

    // --- 2. ACT ---
    registry.remove(scene.id);
    let report = scheduler.pulse();
    scheduler.wait_for_previous();

    // --- 3. ASSERT ---
    assert_eq!(report.drained, 0);
    assert_eq!(report.submitted, 0);
    assert_eq!(scene.syncs.load(Ordering::SeqCst), 0);
    assert_eq!(scene.renders.load(Ordering::SeqCst), 0);
}

#[test]
fn test_scene_refusing_sync_gets_no_job() {
    let (scheduler, registry, lock) = scheduler();
    let scene = FakeScene::new(&lock);
    scene.attached.store(false, Ordering::SeqCst);
    registry.mark_dirty(scene.id, &scene);

    let report = scheduler.pulse();
    scheduler.wait_for_previous();

    assert_eq!(report.drained, 1);
    assert_eq!(report.submitted, 0);
    assert_eq!(scene.renders.load(Ordering::SeqCst), 0);
    assert!(lock.is_balanced());
}

#[test]
fn test_renders_run_off_the_scene_thread_and_serially() {
    let (scheduler, registry, lock) = scheduler();
    let scenes: Vec<_> = (0..3).map(|_| FakeScene::new(&lock)).collect();

    for pulse in 0..3 {
        for scene in &scenes {
            registry.mark_dirty(scene.id, scene);
        }
        let report = scheduler.pulse();
        assert_eq!(report.pulse, pulse + 1);
        assert_eq!(report.submitted, 3);
    }
    scheduler.wait_for_previous();

    let me = thread::current().id();
    for scene in &scenes {
        assert_eq!(scene.renders.load(Ordering::SeqCst), 3);
        let threads = scene.render_threads.lock().unwrap();
        assert!(threads.iter().all(|t| *t != me));
        assert!(threads.windows(2).all(|w| w[0] == w[1]));
    }
    assert_eq!(scheduler.pulse_count(), 3);
    assert!(lock.is_balanced());
}

#[test]
fn test_finished_jobs_are_released_without_waiting() {
    // --- 1. ARRANGE ---
    let registry = Arc::new(PulseRegistry::new());
    let queue = Arc::new(RenderQueue::start().expect("render thread should spawn"));
    let scheduler = PulseScheduler::new(Arc::clone(&registry), Arc::clone(&queue), false);
    let lock = Arc::new(CountingLock::new());
    let scene = FakeScene::new(&lock);

    // --- 2. ACT ---
    for _ in 0..50 {
        registry.mark_dirty(scene.id, &scene);
        scheduler.pulse();
    }
    queue.flush().expect("queue should flush");
    registry.mark_dirty(scene.id, &scene);
    scheduler.pulse();

    // --- 3. ASSERT ---
    assert_eq!(scheduler.in_flight_jobs(), 1);
    scheduler.wait_for_previous();
    assert_eq!(scene.renders.load(Ordering::SeqCst), 51);
    assert_eq!(scheduler.in_flight_jobs(), 0);
}
