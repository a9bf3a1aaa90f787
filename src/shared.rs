//! A store behind a mutex, for callers on several threads.

use crate::error::Result;
use crate::store::{Store, StoreConfig};
use crate::subscriptions::ChangeReceiver;
use crate::types::{Changes, Payload};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Cloneable handle to a store whose operations are serialized by a mutex.
///
/// Subscription callbacks run while the lock is held; they must not call
/// back into the same handle.
pub struct SharedStore<T> {
    inner: Arc<Mutex<Store<T>>>,
}

impl<T> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Serialize> SharedStore<T> {
    pub fn new(store: Store<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn commit(&self, name: &str) -> Result<Changes> {
        self.inner.lock().commit(name)
    }

    pub fn commit_with<P: Serialize>(&self, name: &str, payload: &P) -> Result<Changes> {
        self.inner.lock().commit_with(name, payload)
    }

    pub fn apply(&self, name: &str, payload: Payload) -> Result<Changes> {
        self.inner.lock().apply(name, payload)
    }

    pub fn get_state(&self) -> T {
        self.inner.lock().get_state()
    }

    /// Run `f` against the current state while holding the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.lock().with_state(f)
    }

    pub fn previous_state(&self) -> Option<T> {
        self.inner.lock().previous_state()
    }

    pub fn to_value(&self) -> Result<Value> {
        self.inner.lock().to_value()
    }

    pub fn getter(&self, name: &str) -> Result<Value> {
        self.inner.lock().getter(name)
    }

    pub fn getter_with<A: Serialize>(&self, name: &str, args: &A) -> Result<Value> {
        self.inner.lock().getter_with(name, args)
    }

    pub fn getter_as<R, A>(&self, name: &str, args: &A) -> Result<R>
    where
        R: DeserializeOwned,
        A: Serialize,
    {
        self.inner.lock().getter_as(name, args)
    }

    pub fn subscribe_events<F, I>(&self, callback: F, watched_keys: I)
    where
        F: FnMut(&T, &Changes) + Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.inner.lock().subscribe_events(callback, watched_keys)
    }

    pub fn subscribe_channel<I>(&self, watched_keys: I) -> ChangeReceiver<T>
    where
        T: Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.inner.lock().subscribe_channel(watched_keys)
    }

    pub fn disable_event_listeners(&self) {
        self.inner.lock().disable_event_listeners()
    }

    pub fn enable_event_listeners(&self) {
        self.inner.lock().enable_event_listeners()
    }

    pub fn is_listening(&self) -> bool {
        self.inner.lock().is_listening()
    }

    /// Watched keys of the current subscription, copied out of the lock.
    pub fn watched_keys(&self) -> Option<Vec<String>> {
        self.inner.lock().watched_keys().map(<[String]>::to_vec)
    }

    pub fn commit_count(&self) -> u64 {
        self.inner.lock().commit_count()
    }

    pub fn mutation_names(&self) -> Vec<String> {
        self.inner.lock().mutation_names()
    }

    pub fn getter_names(&self) -> Vec<String> {
        self.inner.lock().getter_names()
    }

    pub fn config(&self) -> StoreConfig {
        self.inner.lock().config().clone()
    }
}

impl<T: Clone + Serialize> From<Store<T>> for SharedStore<T> {
    fn from(store: Store<T>) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Getters, Mutations};
    use crate::store::StoreOptions;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_commits_from_many_threads() {
        let store = Store::with_mutations(
            json!({"count": 0}),
            Mutations::new().with("inc", |s: &mut Value, _| {
                let count = s["count"].as_i64().unwrap_or(0);
                s["count"] = json!(count + 1);
                Ok(())
            }),
        )
        .unwrap();
        let shared = SharedStore::new(store);
        let changes = shared.subscribe_channel(Vec::<String>::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.commit("inc").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.get_state()["count"], 100);
        assert_eq!(shared.commit_count(), 100);
        assert_eq!(changes.drain().len(), 100);
    }

    #[test]
    fn test_handle_mirrors_store_surface() {
        let store = Store::new(
            StoreOptions::new(json!({"count": 0}))
                .mutations(Mutations::new().with("set", |s: &mut Value, p| {
                    let count: i64 = p.parse()?;
                    s["count"] = json!(count);
                    Ok(())
                }))
                .getters(Getters::new().with("getCount", |s: &Value, _| s["count"].clone())),
        )
        .unwrap();
        let shared = SharedStore::from(store);

        assert_eq!(shared.mutation_names(), vec!["set"]);
        assert_eq!(shared.getter_names(), vec!["getCount"]);
        assert!(!shared.config().skip_unchanged);
        assert!(!shared.is_listening());
        assert!(shared.watched_keys().is_none());

        shared.subscribe_events(|_, _| {}, ["count"]);
        assert!(shared.is_listening());
        assert_eq!(shared.watched_keys(), Some(vec!["count".to_string()]));

        let changes = shared.apply("set", Payload::new("set", json!(7))).unwrap();
        assert_eq!(changes.to_value(), json!({"count": 7}));
        assert_eq!(shared.to_value().unwrap(), json!({"count": 7}));
        assert_eq!(shared.getter("getCount").unwrap(), json!(7));
    }
}
