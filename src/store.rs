//! Main Store struct tying registries, diffing and the subscription together.

use crate::error::{Result, StoreError};
use crate::registry::{GetterFn, Getters, MutationFn, Mutations};
use crate::state;
use crate::subscriptions::{ChangeReceiver, Listener, Subscription};
use crate::types::{Changes, Payload, StateChange};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Store configuration.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Drop commits whose diff is empty: state, previous snapshot and
    /// subscription are left untouched.
    ///
    /// The subscription precondition is checked before the mutation runs,
    /// so with listening enabled and nothing subscribed even a commit that
    /// would be dropped fails with [`StoreError::SubscriptionRequired`].
    pub skip_unchanged: bool,
}

/// Everything a store is built from.
pub struct StoreOptions<T> {
    /// Initial state. Must serialize to a record.
    pub state: T,

    /// Named mutations (None behaves as an empty registry).
    pub mutations: Option<Mutations<T>>,

    /// Named getters (None behaves as an empty registry).
    pub getters: Option<Getters<T>>,

    pub config: StoreConfig,
}

impl<T> StoreOptions<T> {
    pub fn new(state: T) -> Self {
        Self {
            state,
            mutations: None,
            getters: None,
            config: StoreConfig::default(),
        }
    }

    pub fn mutations(mut self, mutations: Mutations<T>) -> Self {
        self.mutations = Some(mutations);
        self
    }

    pub fn getters(mut self, getters: Getters<T>) -> Self {
        self.getters = Some(getters);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }
}

/// An in-memory state container.
///
/// Provides:
/// - Writes through named mutations (`commit`)
/// - Reads as independent copies (`get_state`) or through named getters
/// - One change subscription with an optional key filter
/// - One generation of history (`previous_state`)
///
/// Copies are made with `T::clone`, which must be a deep copy: state that
/// shares `Rc`/`Arc` cells with interior mutability aliases across copies.
///
/// Not synchronized: wrap it in a [`SharedStore`](crate::SharedStore)
/// to use it from several threads.
pub struct Store<T> {
    config: StoreConfig,

    /// Current state. Never handed out by reference beyond a call.
    state: T,

    /// State before the most recent applied commit.
    previous: Option<T>,

    mutations: Option<Mutations<T>>,
    getters: Option<Getters<T>>,
    listener: Listener<T>,

    /// Number of applied commits.
    commits: u64,
}

impl<T: Clone + Serialize> Store<T> {
    /// Create a store from `options`.
    ///
    /// Fails with [`StoreError::Config`] if the state is not a record.
    pub fn new(options: StoreOptions<T>) -> Result<Self> {
        let record = state::to_record(&options.state)?;

        debug!(
            fields = record.len(),
            mutations = options.mutations.as_ref().map_or(0, Mutations::len),
            getters = options.getters.as_ref().map_or(0, Getters::len),
            "store created"
        );

        Ok(Self {
            config: options.config,
            state: options.state,
            previous: None,
            mutations: options.mutations,
            getters: options.getters,
            listener: Listener::new(),
            commits: 0,
        })
    }

    /// Shorthand for a store with only an initial state and mutations.
    pub fn with_mutations(state: T, mutations: Mutations<T>) -> Result<Self> {
        Self::new(StoreOptions::new(state).mutations(mutations))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Writes ---

    /// Apply the mutation `name` without a payload.
    pub fn commit(&mut self, name: &str) -> Result<Changes> {
        self.apply(name, Payload::none(name))
    }

    /// Apply the mutation `name` with `payload`.
    pub fn commit_with<P: Serialize>(&mut self, name: &str, payload: &P) -> Result<Changes> {
        self.mutation(name)?;
        self.apply(name, Payload::encode(name, payload)?)
    }

    /// Apply the mutation `name` with an already built payload.
    ///
    /// The mutation runs against a copy of the current state. Nothing is
    /// changed if the name is unknown, if listening is enabled without a
    /// subscription, or if the mutation fails.
    pub fn apply(&mut self, name: &str, payload: Payload) -> Result<Changes> {
        let mutation = self.mutation(name)?;
        self.listener.ready()?;

        let mut working = self.state.clone();
        mutation(&mut working, &payload)?;

        let changes = state::diff(&self.state, &working)?;

        if changes.is_empty() && self.config.skip_unchanged {
            debug!(mutation = name, "nothing changed");
            return Ok(changes);
        }

        let previous = std::mem::replace(&mut self.state, working);
        let previous = self.previous.insert(previous);
        self.commits += 1;

        debug!(
            mutation = name,
            changed = ?changes.keys().collect::<Vec<_>>(),
            commit = self.commits,
            "committed"
        );

        self.listener.notify(previous, &changes)?;
        Ok(changes)
    }

    // --- Reads ---

    /// An independent copy of the current state.
    pub fn get_state(&self) -> T {
        self.state.clone()
    }

    /// Run `f` against the current state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state)
    }

    /// A copy of the state before the most recent applied commit.
    pub fn previous_state(&self) -> Option<T> {
        self.previous.clone()
    }

    /// Current state in record form.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.state)?)
    }

    /// Number of applied commits.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Evaluate the getter `name` without arguments.
    pub fn getter(&self, name: &str) -> Result<Value> {
        self.evaluate(name, Payload::none(name))
    }

    /// Evaluate the getter `name` with `args`.
    pub fn getter_with<A: Serialize>(&self, name: &str, args: &A) -> Result<Value> {
        self.getter_fn(name)?;
        self.evaluate(name, Payload::encode(name, args)?)
    }

    /// Evaluate the getter `name` and decode its result into `R`.
    pub fn getter_as<R, A>(&self, name: &str, args: &A) -> Result<R>
    where
        R: DeserializeOwned,
        A: Serialize,
    {
        Ok(serde_json::from_value(self.getter_with(name, args)?)?)
    }

    fn evaluate(&self, name: &str, args: Payload) -> Result<Value> {
        let getter = self.getter_fn(name)?;
        getter(&self.state, &args)
    }

    fn mutation(&self, name: &str) -> Result<&MutationFn<T>> {
        self.mutations
            .as_ref()
            .and_then(|m| m.get(name))
            .ok_or_else(|| StoreError::UnknownMutation(name.to_string()))
    }

    fn getter_fn(&self, name: &str) -> Result<&GetterFn<T>> {
        self.getters
            .as_ref()
            .and_then(|g| g.get(name))
            .ok_or_else(|| StoreError::UnknownGetter(name.to_string()))
    }

    pub fn mutation_names(&self) -> Vec<String> {
        self.mutations.as_ref().map(Mutations::names).unwrap_or_default()
    }

    pub fn getter_names(&self) -> Vec<String> {
        self.getters.as_ref().map(Getters::names).unwrap_or_default()
    }

    // --- Subscription ---

    /// Install the subscription, replacing any earlier one, and start
    /// listening. An empty `watched_keys` means every commit notifies.
    ///
    /// With watched keys the callback runs once per watched key present in
    /// the diff, so one commit may call it several times.
    pub fn subscribe_events<F, I>(&mut self, callback: F, watched_keys: I)
    where
        F: FnMut(&T, &Changes) + Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let keys = watched_keys.into_iter().map(Into::into).collect();
        self.listener.subscribe(Subscription::new(callback, keys));
    }

    /// Subscribe through a channel instead of a callback.
    ///
    /// Each callback delivery becomes one [`StateChange`] on the receiver.
    pub fn subscribe_channel<I>(&mut self, watched_keys: I) -> ChangeReceiver<T>
    where
        T: Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribe_events(
            move |previous: &T, changes: &Changes| {
                // A dropped receiver just stops delivery.
                let _ = sender.send(StateChange {
                    previous: previous.clone(),
                    changes: changes.clone(),
                });
            },
            watched_keys,
        );
        ChangeReceiver { receiver }
    }

    /// Stop notifying. The subscription is kept.
    pub fn disable_event_listeners(&mut self) {
        self.listener.disable();
    }

    /// Resume notifying the stored subscription.
    ///
    /// Commits fail with [`StoreError::SubscriptionRequired`] while
    /// listening is enabled and nothing was ever subscribed.
    pub fn enable_event_listeners(&mut self) {
        self.listener.enable();
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_active()
    }

    /// Watched keys of the current subscription, if any.
    pub fn watched_keys(&self) -> Option<&[String]> {
        self.listener.watched_keys()
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("previous", &self.previous)
            .field("mutations", &self.mutations)
            .field("getters", &self.getters)
            .field("listening", &self.listener.is_active())
            .field("commits", &self.commits)
            .finish()
    }
}
