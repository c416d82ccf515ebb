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

//! The render thread and its job queue.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use lanterna_core::RenderError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};

/// A unit of work executed on the render thread.
pub type RenderJob = Box<dyn FnOnce() + Send + 'static>;

/// How a render job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job returned normally.
    Completed,
    /// The job panicked. The panic was contained and logged.
    Panicked,
}

/// Completion handle of a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    done: Receiver<JobOutcome>,
    outcome: OnceLock<JobOutcome>,
}

impl JobHandle {
    fn new(done: Receiver<JobOutcome>) -> Self {
        Self {
            done,
            outcome: OnceLock::new(),
        }
    }

    /// Blocks until the job finished. A job dropped without running (queue
    /// shut down) reports [`JobOutcome::Panicked`].
    pub fn wait(&self) -> JobOutcome {
        if let Some(outcome) = self.outcome.get() {
            return *outcome;
        }
        let outcome = self.done.recv().unwrap_or(JobOutcome::Panicked);
        *self.outcome.get_or_init(|| outcome)
    }

    /// Returns the outcome if the job already finished.
    pub fn try_outcome(&self) -> Option<JobOutcome> {
        if let Some(outcome) = self.outcome.get() {
            return Some(*outcome);
        }
        let outcome = match self.done.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => JobOutcome::Panicked,
        };
        Some(*self.outcome.get_or_init(|| outcome))
    }

    /// Returns `true` once the job ran or was dropped by a stopped queue.
    pub fn is_finished(&self) -> bool {
        self.try_outcome().is_some()
    }
}

struct QueuedJob {
    job: RenderJob,
    done: Sender<JobOutcome>,
}

#[derive(Debug, Default)]
struct QueueStats {
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Owns the render thread. Jobs run one at a time, in submission order.
#[derive(Debug)]
pub struct RenderQueue {
    sender: Option<Sender<QueuedJob>>,
    handle: Option<JoinHandle<()>>,
    thread_id: ThreadId,
    stats: Arc<QueueStats>,
}

impl RenderQueue {
    /// Spawns the render thread.
    pub fn start() -> Result<Self, RenderError> {
        Self::start_named("lanterna-render")
    }

    /// Spawns the render thread with a custom thread name.
    pub fn start_named(name: &str) -> Result<Self, RenderError> {
        let (sender, receiver) = crossbeam_channel::unbounded::<QueuedJob>();
        let stats = Arc::new(QueueStats::default());
        let thread_stats = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                log::info!("RenderQueue: render thread started.");
                for QueuedJob { job, done } in receiver.iter() {
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(job)) {
                        Ok(()) => {
                            thread_stats.completed.fetch_add(1, Ordering::Relaxed);
                            JobOutcome::Completed
                        }
                        Err(payload) => {
                            log::error!(
                                "RenderQueue: render job panicked: {}",
                                panic_message(payload.as_ref())
                            );
                            thread_stats.panicked.fetch_add(1, Ordering::Relaxed);
                            JobOutcome::Panicked
                        }
                    };
                    // The submitter may have dropped its handle.
                    let _ = done.send(outcome);
                }
                log::info!("RenderQueue: render thread stopped.");
            })
            .map_err(|e| RenderError::Internal(format!("failed to spawn render thread: {e}")))?;

        Ok(Self {
            sender: Some(sender),
            thread_id: handle.thread().id(),
            handle: Some(handle),
            stats,
        })
    }

    /// Queues a job for the render thread.
    pub fn submit<F>(&self, job: F) -> Result<JobHandle, RenderError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(RenderError::RenderThreadStopped)?;
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        sender
            .send(QueuedJob {
                job: Box::new(job),
                done: done_tx,
            })
            .map_err(|_| RenderError::RenderThreadStopped)?;
        Ok(JobHandle::new(done_rx))
    }

    /// Blocks until every job submitted so far has run.
    pub fn flush(&self) -> Result<(), RenderError> {
        self.submit(|| {})?.wait();
        Ok(())
    }

    /// Returns `true` when called from the render thread.
    pub fn is_render_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) is called.
    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Number of jobs that returned normally.
    pub fn completed_jobs(&self) -> u64 {
        self.stats.completed.load(Ordering::Relaxed)
    }

    /// Number of jobs that panicked.
    pub fn panicked_jobs(&self) -> u64 {
        self.stats.panicked.load(Ordering::Relaxed)
    }

    /// Runs every queued job, then stops the render thread.
    pub fn shutdown(&mut self) {
        // Closing the channel ends the thread's receive loop.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                log::error!("RenderQueue: shutdown requested from the render thread itself.");
                return;
            }
            if handle.join().is_err() {
                log::error!("RenderQueue: render thread terminated abnormally.");
            }
        }
    }
}

impl Drop for RenderQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Extracts the message of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_jobs_run_in_submission_order() {
        let queue = RenderQueue::start().expect("render thread should spawn");
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let order = Arc::clone(&order);
                queue
                    .submit(move || order.lock().unwrap().push(i))
                    .expect("queue is running")
            })
            .collect();
        for handle in &handles {
            assert_eq!(handle.wait(), JobOutcome::Completed);
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.completed_jobs(), 5);
    }

    #[test]
    fn test_jobs_run_on_the_render_thread() {
        let queue = Arc::new(RenderQueue::start().expect("render thread should spawn"));
        assert!(!queue.is_render_thread());

        let inner = Arc::clone(&queue);
        let (tx, rx) = crossbeam_channel::bounded(1);
        queue
            .submit(move || tx.send(inner.is_render_thread()).unwrap())
            .expect("queue is running")
            .wait();
        assert!(rx.recv().unwrap());
    }

    #[test]
    fn test_panicking_job_does_not_kill_the_thread() {
        let queue = RenderQueue::start().expect("render thread should spawn");
        let outcome = queue
            .submit(|| panic!("boom"))
            .expect("queue is running")
            .wait();
        assert_eq!(outcome, JobOutcome::Panicked);

        let outcome = queue.submit(|| {}).expect("queue is running").wait();
        assert_eq!(outcome, JobOutcome::Completed);
        assert_eq!(queue.panicked_jobs(), 1);
    }

    #[test]
    fn test_finished_handle_keeps_its_outcome() {
        let queue = RenderQueue::start().expect("render thread should spawn");
        let handle = queue.submit(|| panic!("boom")).expect("queue is running");
        queue.flush().expect("queue is running");

        assert!(handle.is_finished());
        assert_eq!(handle.try_outcome(), Some(JobOutcome::Panicked));
        assert_eq!(handle.wait(), JobOutcome::Panicked);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut queue = RenderQueue::start().expect("render thread should spawn");
        queue.flush().expect("queue is running");
        queue.shutdown();
        assert!(!queue.is_running());
        assert!(matches!(
            queue.submit(|| {}),
            Err(RenderError::RenderThreadStopped)
        ));
    }
}
