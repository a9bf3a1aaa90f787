//! Subscription types.

use crate::types::{Changes, StateChange};
use std::fmt;

/// Callback invoked with `(previous_state, changes)`.
pub type ChangeCallback<T> = Box<dyn FnMut(&T, &Changes) + Send>;

/// The registered observer and its key filter.
pub struct Subscription<T> {
    pub(crate) callback: ChangeCallback<T>,

    /// Top-level keys to watch (empty = every commit).
    pub watched_keys: Vec<String>,
}

impl<T> Subscription<T> {
    pub fn new<F>(callback: F, watched_keys: Vec<String>) -> Self
    where
        F: FnMut(&T, &Changes) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
            watched_keys,
        }
    }

    /// Number of times the callback should fire for `changes`.
    pub fn deliveries(&self, changes: &Changes) -> usize {
        if self.watched_keys.is_empty() {
            return 1;
        }

        self.watched_keys
            .iter()
            .filter(|key| changes.contains_key(key))
            .count()
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("watched_keys", &self.watched_keys)
            .finish_non_exhaustive()
    }
}

/// Receiving end of a channel subscription.
pub struct ChangeReceiver<T> {
    pub(crate) receiver: crossbeam_channel::Receiver<StateChange<T>>,
}

impl<T> ChangeReceiver<T> {
    /// Receive the next change (blocking).
    ///
    /// Fails once the store has dropped or replaced the subscription and
    /// every buffered change has been received.
    pub fn recv(&self) -> Result<StateChange<T>, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a change (non-blocking).
    pub fn try_recv(&self) -> Result<StateChange<T>, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StateChange<T>, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every buffered change.
    pub fn drain(&self) -> Vec<StateChange<T>> {
        self.receiver.try_iter().collect()
    }

    /// Number of buffered changes.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
