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

/// A generic, thread-safe notification channel.
///
/// Producers (typically painters on the render thread) hold a cloned
/// [`flume::Sender`]; the owner of the bus drains the receiving end on the
/// scene thread, so no listener code ever runs on the render thread.
#[derive(Debug)]
pub struct NotificationBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> NotificationBus<T> {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("NotificationBus initialized.");
        Self { sender, receiver }
    }

    /// Sends a notification, logging an error if the receiver is gone.
    pub fn publish(&self, notification: T) {
        if let Err(e) = self.sender.send(notification) {
            log::error!("Failed to publish notification: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Removes and returns every notification queued so far, without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for NotificationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum TestNotification {
        Painted(u64),
        Lost,
    }

    #[test]
    fn drain_returns_in_publish_order() {
        let bus = NotificationBus::<TestNotification>::new();
        bus.publish(TestNotification::Painted(1));
        bus.publish(TestNotification::Lost);
        bus.publish(TestNotification::Painted(2));

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.drain(),
            vec![
                TestNotification::Painted(1),
                TestNotification::Lost,
                TestNotification::Painted(2),
            ]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn publish_from_another_thread() {
        let bus = NotificationBus::<TestNotification>::new();
        let sender = bus.sender();

        thread::spawn(move || {
            sender
                .send(TestNotification::Painted(7))
                .expect("Send should succeed");
        })
        .join()
        .expect("Sender thread panicked");

        assert_eq!(bus.drain(), vec![TestNotification::Painted(7)]);
    }
}
