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

//! Asynchronous pixel delivery from the render thread to a host.

use super::pixels::PixelBuffer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Receives read-back frames from the uploading painter.
///
/// Generations are issued by the sink itself, so every painter feeding the
/// same sink draws from one sequence. A host is free to ignore anything not
/// newer than what it already composited.
pub trait PixelSink: Send + Sync {
    /// Issues the generation for the next frame. Monotonic per sink.
    fn next_generation(&self) -> u64;

    /// Hands a frame over. Returns `false` if the delivery was rejected.
    fn upload_pixels(&self, buffer: PixelBuffer, generation: u64) -> bool;
}

/// One delivered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// The pixels.
    pub buffer: PixelBuffer,
    /// Generation issued by the receiving sink.
    pub generation: u64,
}

/// A single-slot mailbox between a producer and a compositing host.
///
/// A new offer replaces a pending one rather than queueing behind it, so the
/// host only ever composites the newest frame.
#[derive(Debug, Default)]
pub struct UploadSlot {
    pending: Mutex<Option<Upload>>,
    newest: AtomicU64,
    dropped: AtomicU64,
    delivered: AtomicU64,
    issued: AtomicU64,
}

impl UploadSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a frame.
    ///
    /// A generation not newer than the newest one seen is discarded. A pending
    /// frame that was never taken is replaced. Both cases count as dropped.
    pub fn offer(&self, buffer: PixelBuffer, generation: u64) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= self.newest.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::trace!("UploadSlot: ignoring stale generation {generation}");
            return false;
        }
        self.newest.store(generation, Ordering::Release);
        if pending.replace(Upload { buffer, generation }).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        true
    }

    /// Takes the newest pending frame, if any.
    pub fn take(&self) -> Option<Upload> {
        let upload = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if upload.is_some() {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        }
        upload
    }

    /// Returns `true` if a frame is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Newest generation offered so far, `0` if none.
    pub fn newest_generation(&self) -> u64 {
        self.newest.load(Ordering::Acquire)
    }

    /// Issues a generation newer than any issued or offered so far.
    pub fn next_generation(&self) -> u64 {
        self.issued
            .fetch_max(self.newest.load(Ordering::Acquire), Ordering::AcqRel);
        self.issued.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of frames replaced or rejected before being taken.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Number of frames taken by the host.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl PixelSink for UploadSlot {
    fn next_generation(&self) -> u64 {
        UploadSlot::next_generation(self)
    }

    fn upload_pixels(&self, buffer: PixelBuffer, generation: u64) -> bool {
        self.offer(buffer, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_newer_offer_replaces_pending() {
        let slot = UploadSlot::new();
        assert!(slot.offer(PixelBuffer::new(1, 1), 1));
        assert!(slot.offer(PixelBuffer::new(2, 2), 2));
        assert_eq!(slot.dropped(), 1);

        let upload = slot.take().expect("a frame is pending");
        assert_eq!(upload.generation, 2);
        assert_eq!(upload.buffer.width(), 2);
        assert!(slot.take().is_none());
        assert_eq!(slot.delivered(), 1);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let slot = UploadSlot::new();
        assert!(slot.offer(PixelBuffer::new(1, 1), 5));
        assert!(slot.take().is_some());

        assert!(!slot.offer(PixelBuffer::new(1, 1), 4));
        assert!(!slot.offer(PixelBuffer::new(1, 1), 5));
        assert!(!slot.has_pending());
        assert_eq!(slot.newest_generation(), 5);
        assert_eq!(slot.dropped(), 2);
    }

    #[test]
    fn test_generations_are_shared_by_every_producer() {
        let slot = UploadSlot::new();
        let first = slot.next_generation();
        let second = slot.next_generation();
        assert_eq!((first, second), (1, 2));
        assert!(slot.offer(PixelBuffer::new(1, 1), second));

        // A second producer starting late still lands above the first one.
        assert!(slot.offer(PixelBuffer::new(1, 1), 9));
        let late = slot.next_generation();
        assert_eq!(late, 10);
        assert!(slot.offer(PixelBuffer::new(2, 2), late));
        assert_eq!(slot.take().map(|upload| upload.generation), Some(10));
    }

    #[test]
    fn test_concurrent_offers_keep_newest() {
        let slot = Arc::new(UploadSlot::new());
        let handles: Vec<_> = (1..=8u64)
            .map(|generation| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    slot.upload_pixels(PixelBuffer::new(1, 1), generation);
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("offer thread panicked");
        }

        let upload = slot.take().expect("one frame survives");
        assert_eq!(upload.generation, 8);
        assert_eq!(slot.newest_generation(), 8);
        assert_eq!(slot.dropped() + slot.delivered(), 8);
    }
}
