//! The single subscription slot of a store.

use crate::error::{Result, StoreError};
use crate::types::Changes;
use tracing::trace;

use super::types::Subscription;

/// Holds at most one subscription and whether notifications are delivered.
pub struct Listener<T> {
    subscription: Option<Subscription<T>>,
    active: bool,
}

impl<T> Listener<T> {
    pub fn new() -> Self {
        Self {
            subscription: None,
            active: false,
        }
    }

    /// Install `subscription`, replacing any earlier one, and start listening.
    pub fn subscribe(&mut self, subscription: Subscription<T>) {
        trace!(watched_keys = ?subscription.watched_keys, "subscription installed");
        self.subscription = Some(subscription);
        self.active = true;
    }

    /// Stop delivering notifications. The subscription is kept.
    pub fn disable(&mut self) {
        self.active = false;
    }

    /// Resume delivering notifications to the stored subscription.
    pub fn enable(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    /// Watched keys of the current subscription, if any.
    pub fn watched_keys(&self) -> Option<&[String]> {
        self.subscription.as_ref().map(|s| s.watched_keys.as_slice())
    }

    /// Check that a notification could be delivered right now.
    pub fn ready(&self) -> Result<()> {
        if self.active && self.subscription.is_none() {
            return Err(StoreError::SubscriptionRequired);
        }
        Ok(())
    }

    /// Deliver a committed change. Returns how many times the callback ran.
    pub fn notify(&mut self, previous: &T, changes: &Changes) -> Result<usize> {
        if !self.active {
            return Ok(0);
        }

        let subscription = self
            .subscription
            .as_mut()
            .ok_or(StoreError::SubscriptionRequired)?;

        let deliveries = subscription.deliveries(changes);
        for _ in 0..deliveries {
            (subscription.callback)(previous, changes);
        }

        trace!(deliveries, changed = changes.len(), "subscription notified");
        Ok(deliveries)
    }
}

impl<T> Default for Listener<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(keys: &[&str]) -> (Subscription<i64>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = Subscription::new(
            move |_: &i64, _: &Changes| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            keys.iter().map(|k| k.to_string()).collect(),
        );
        (sub, calls)
    }

    fn change(key: &str) -> Changes {
        let mut changes = Changes::new();
        changes.insert(key.to_string(), json!(1));
        changes
    }

    #[test]
    fn test_inactive_by_default() {
        let mut listener = Listener::<i64>::new();
        assert!(!listener.is_active());
        assert!(listener.ready().is_ok());
        assert_eq!(listener.notify(&0, &change("a")).unwrap(), 0);
    }

    #[test]
    fn test_notify_filtered() {
        let mut listener = Listener::new();
        let (sub, calls) = counting(&["a"]);
        listener.subscribe(sub);

        assert_eq!(listener.notify(&0, &change("b")).unwrap(), 0);
        assert_eq!(listener.notify(&0, &change("a")).unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disable_keeps_subscription() {
        let mut listener = Listener::new();
        let (sub, calls) = counting(&[]);
        listener.subscribe(sub);
        listener.disable();

        assert!(listener.has_subscription());
        assert_eq!(listener.notify(&0, &change("a")).unwrap(), 0);

        listener.enable();
        assert_eq!(listener.notify(&0, &change("a")).unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_enable_without_subscription() {
        let mut listener = Listener::<i64>::new();
        listener.enable();

        assert!(matches!(
            listener.ready(),
            Err(StoreError::SubscriptionRequired)
        ));
        assert!(matches!(
            listener.notify(&0, &change("a")),
            Err(StoreError::SubscriptionRequired)
        ));
    }

    #[test]
    fn test_subscribe_replaces() {
        let mut listener = Listener::new();
        let (first, first_calls) = counting(&[]);
        let (second, second_calls) = counting(&["x"]);

        listener.subscribe(first);
        listener.subscribe(second);
        listener.notify(&0, &change("x")).unwrap();

        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(listener.watched_keys(), Some(&["x".to_string()][..]));
    }
}
