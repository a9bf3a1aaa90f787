//! Getter registry.

use crate::error::Result;
use crate::types::Payload;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A type-erased getter: derives a JSON value from a state snapshot.
pub type GetterFn<T> = Box<dyn Fn(&T, &Payload) -> Result<Value> + Send>;

/// Named getter functions.
pub struct Getters<T> {
    entries: HashMap<String, GetterFn<T>>,
}

impl<T> Getters<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register an infallible getter under `name`.
    pub fn insert<F, R>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&T, &Payload) -> R + Send + 'static,
        R: Serialize,
    {
        self.entries.insert(
            name.into(),
            Box::new(move |state: &T, args: &Payload| -> Result<Value> {
                Ok(serde_json::to_value(f(state, args))?)
            }),
        );
    }

    /// Register a getter that can fail, e.g. on a malformed argument.
    pub fn try_insert<F, R>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&T, &Payload) -> Result<R> + Send + 'static,
        R: Serialize,
    {
        self.entries.insert(
            name.into(),
            Box::new(move |state: &T, args: &Payload| -> Result<Value> {
                Ok(serde_json::to_value(f(state, args)?)?)
            }),
        );
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<F, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, &Payload) -> R + Send + 'static,
        R: Serialize,
    {
        self.insert(name, f);
        self
    }

    /// Builder form of [`try_insert`](Self::try_insert).
    pub fn try_with<F, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, &Payload) -> Result<R> + Send + 'static,
        R: Serialize,
    {
        self.try_insert(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&GetterFn<T>> {
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

impl<T> Default for Getters<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Getters<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getters")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serde_json::json;

    #[derive(Clone)]
    struct Todo {
        id: u32,
        title: String,
    }

    #[test]
    fn test_getter_result_is_json() {
        let getters = Getters::<Vec<Todo>>::new().with("count", |todos, _| todos.len());

        let todos = vec![Todo {
            id: 1,
            title: "wash clothes".into(),
        }];
        let value = getters.get("count").unwrap()(&todos, &Payload::none("count")).unwrap();
        assert_eq!(value, json!(1));
    }

    #[test]
    fn test_fallible_getter_with_args() {
        let getters = Getters::<Vec<Todo>>::new().try_with("title", |todos, args| {
            let id: u32 = args.parse()?;
            Ok(todos.iter().find(|t| t.id == id).map(|t| t.title.clone()))
        });

        let todos = vec![
            Todo {
                id: 1,
                title: "wash clothes".into(),
            },
            Todo {
                id: 2,
                title: "watch movie".into(),
            },
        ];
        let title = getters.get("title").unwrap();

        let found = title(&todos, &Payload::new("title", json!(2))).unwrap();
        assert_eq!(found, json!("watch movie"));

        let missing = title(&todos, &Payload::new("title", json!(9))).unwrap();
        assert_eq!(missing, Value::Null);

        let bad = title(&todos, &Payload::new("title", json!("two")));
        assert!(matches!(bad, Err(StoreError::InvalidPayload { .. })));
    }

    #[test]
    fn test_empty_registry() {
        let getters = Getters::<i64>::default();
        assert!(getters.is_empty());
        assert!(getters.get("anything").is_none());
    }
}
