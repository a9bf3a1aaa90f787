//! Mutation registry.

use crate::error::Result;
use crate::types::Payload;
use std::collections::HashMap;
use std::fmt;

/// A mutation: modifies the working copy of state in place.
pub type MutationFn<T> = Box<dyn Fn(&mut T, &Payload) -> Result<()> + Send>;

/// Named mutation functions, the only write path into a store.
pub struct Mutations<T> {
    entries: HashMap<String, MutationFn<T>>,
}

impl<T> Mutations<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `f` under `name`, replacing any earlier mutation of that name.
    pub fn insert<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut T, &Payload) -> Result<()> + Send + 'static,
    {
        self.entries.insert(name.into(), Box::new(f));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut T, &Payload) -> Result<()> + Send + 'static,
    {
        self.insert(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&MutationFn<T>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Mutations<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Mutations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutations")
            .field("names", &self.names())
            .finish()
    }
}
