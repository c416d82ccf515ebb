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

//! The render lock binding the scene thread and the render thread.
//!
//! The scene thread holds it only while it freezes a snapshot; the render
//! thread holds it for a whole painter run. It is reentrant so a painter can
//! call helpers that assert or re-take it.

use lanterna_core::{HostView, SceneId, SceneState};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

/// A reentrant, thread-owned mutual exclusion.
///
/// Every [`acquire`](Self::acquire) must be balanced by exactly one
/// [`release`](Self::release) on the same thread. Releasing a lock the
/// current thread does not hold is a contract violation and panics.
pub trait RenderLock: Send + Sync + Debug {
    /// Blocks until the current thread owns the lock.
    fn acquire(&self);

    /// Releases one level of ownership.
    fn release(&self);

    /// Returns `true` if the current thread owns the lock.
    fn is_held_by_current_thread(&self) -> bool;
}

/// Scoped ownership of a [`RenderLock`]. Releases on drop, including during unwinding.
#[must_use = "the render lock is released as soon as the guard is dropped"]
pub struct RenderLockGuard<'a> {
    lock: &'a dyn RenderLock,
}

impl<'a> RenderLockGuard<'a> {
    /// Acquires `lock` and returns the guard owning it.
    pub fn new(lock: &'a dyn RenderLock) -> Self {
        lock.acquire();
        Self { lock }
    }

    /// Freezes the host's state for `scene_id` while this guard holds the lock.
    ///
    /// ## Panics
    /// If the guarded lock is not owned by the calling thread, which happens
    /// when a guard is moved to or built for another thread.
    pub fn capture(&self, scene_id: SceneId, host: &dyn HostView) -> SceneState {
        if !self.lock.is_held_by_current_thread() {
            log::error!("RenderLockGuard: capture for {scene_id} without owning the render lock.");
            panic!("snapshot captured without holding the render lock");
        }
        SceneState::capture(scene_id, host)
    }
}

impl Drop for RenderLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[derive(Debug, Default)]
struct LockState {
    owner: Option<ThreadId>,
    depth: u32,
}

/// The process-wide render lock.
#[derive(Debug, Default)]
pub struct ProcessRenderLock {
    state: Mutex<LockState>,
    available: Condvar,
}

static GLOBAL_RENDER_LOCK: OnceLock<Arc<ProcessRenderLock>> = OnceLock::new();

impl ProcessRenderLock {
    /// Creates an independent lock. Most callers want [`global`](Self::global).
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock shared by every scene of the process, created on first use.
    pub fn global() -> Arc<ProcessRenderLock> {
        Arc::clone(GLOBAL_RENDER_LOCK.get_or_init(|| {
            log::debug!("ProcessRenderLock: global render lock created.");
            Arc::new(ProcessRenderLock::new())
        }))
    }

    /// Current reentrancy depth, `0` when free.
    pub fn hold_count(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .depth
    }
}

impl RenderLock for ProcessRenderLock {
    fn acquire(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        while state.owner.is_some_and(|owner| owner != me) {
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.owner = Some(me);
        state.depth += 1;
    }

    fn release(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.owner != Some(me) || state.depth == 0 {
            log::error!(
                "ProcessRenderLock: release by {:?} while owned by {:?}",
                me,
                state.owner
            );
            drop(state);
            panic!("render lock released by a thread that does not hold it");
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            self.available.notify_one();
        }
    }

    fn is_held_by_current_thread(&self) -> bool {
        let me = thread::current().id();
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .owner
            == Some(me)
    }
}

/// A [`RenderLock`] that counts acquisitions and releases.
///
/// Used to check that every painter run leaves the lock balanced, whatever
/// the exit path.
#[derive(Debug, Default)]
pub struct CountingLock {
    inner: ProcessRenderLock,
    acquires: AtomicU64,
    releases: AtomicU64,
}

impl CountingLock {
    /// Creates a free lock with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed acquisitions.
    pub fn acquires(&self) -> u64 {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Number of completed releases.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::SeqCst)
    }

    /// Returns `true` if every acquisition was released and nobody holds the lock.
    pub fn is_balanced(&self) -> bool {
        self.acquires() == self.releases() && self.inner.hold_count() == 0
    }
}

impl RenderLock for CountingLock {
    fn acquire(&self) {
        self.inner.acquire();
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.inner.release();
        self.releases.fetch_add(1, Ordering::SeqCst);
    }

    fn is_held_by_current_thread(&self) -> bool {
        self.inner.is_held_by_current_thread()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    #[test]
    fn test_lock_is_reentrant() {
        let lock = ProcessRenderLock::new();
        lock.acquire();
        lock.acquire();
        assert_eq!(lock.hold_count(), 2);
        assert!(lock.is_held_by_current_thread());
        lock.release();
        assert!(lock.is_held_by_current_thread());
        lock.release();
        assert!(!lock.is_held_by_current_thread());
        assert_eq!(lock.hold_count(), 0);
    }

    #[test]
    fn test_lock_excludes_other_threads() {
        let lock = Arc::new(ProcessRenderLock::new());
        let entered = Arc::new(AtomicBool::new(false));

        let guard = RenderLockGuard::new(lock.as_ref());
        let handle = {
            let lock = Arc::clone(&lock);
            let entered = Arc::clone(&entered);
            thread::spawn(move || {
                let _guard = RenderLockGuard::new(lock.as_ref());
                entered.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(30));
        assert!(!entered.load(Ordering::SeqCst), "second thread must wait");
        drop(guard);
        handle.join().expect("waiting thread panicked");
        assert!(entered.load(Ordering::SeqCst));
    }

    #[test]
    #[should_panic(expected = "does not hold it")]
    fn test_unbalanced_release_fails_fast() {
        let lock = ProcessRenderLock::new();
        lock.release();
    }

    #[test]
    fn test_guard_releases_during_unwind() {
        let lock = CountingLock::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RenderLockGuard::new(&lock);
            panic!("scene content exploded");
        }));
        assert!(result.is_err());
        assert_eq!(lock.acquires(), 1);
        assert!(lock.is_balanced());
    }

    #[derive(Debug)]
    struct UnownedLock;

    impl RenderLock for UnownedLock {
        fn acquire(&self) {}
        fn release(&self) {}
        fn is_held_by_current_thread(&self) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct StillHost;

    impl HostView for StillHost {
        fn id(&self) -> u64 {
            1
        }
        fn size(&self) -> (u32, u32) {
            (64, 48)
        }
        fn scale_factor(&self) -> f32 {
            1.0
        }
        fn is_handle_valid(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_capture_copies_host_state_under_the_lock() {
        let lock = ProcessRenderLock::new();
        let guard = RenderLockGuard::new(&lock);
        let id = SceneId::next();
        let state = guard.capture(id, &StillHost);
        assert_eq!(state.scene_id, id);
        assert_eq!((state.width, state.height), (64, 48));
    }

    #[test]
    #[should_panic(expected = "without holding the render lock")]
    fn test_capture_without_ownership_fails_in_every_build() {
        let guard = RenderLockGuard::new(&UnownedLock);
        let _ = guard.capture(SceneId::next(), &StillHost);
    }

    #[test]
    fn test_global_lock_is_shared() {
        let a = ProcessRenderLock::global();
        let b = ProcessRenderLock::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
