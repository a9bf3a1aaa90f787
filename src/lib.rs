//! # Keeper
//!
//! A typed, in-memory state container: one value, written only through
//! named mutations, read through copies or named getters, and observed
//! through a single change subscription.
//!
//! ## Core Concepts
//!
//! - **Mutations**: Named functions that modify a working copy of state
//! - **Getters**: Named functions that derive a value from state
//! - **Changes**: The top-level keys a commit changed, with their new values
//! - **Subscription**: One callback, optionally filtered by watched keys
//!
//! ## Example
//!
//! ```ignore
//! use keeper::{Mutations, Store, StoreOptions};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Counter { count: i64 }
//!
//! let mutations = Mutations::new().with("inc", |s: &mut Counter, p| {
//!     s.count += p.parse::<i64>()?;
//!     Ok(())
//! });
//! let mut store = Store::new(StoreOptions::new(Counter { count: 0 }).mutations(mutations))?;
//!
//! store.subscribe_events(|prev, changes| {
//!     println!("{} -> {:?}", prev.count, changes.get("count"));
//! }, Vec::<String>::new());
//!
//! store.commit_with("inc", &3)?;
//! assert_eq!(store.get_state().count, 3);
//! ```

pub mod error;
pub mod registry;
pub mod shared;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{Result, StoreError};
pub use registry::{GetterFn, Getters, MutationFn, Mutations};
pub use shared::SharedStore;
pub use store::{Store, StoreConfig, StoreOptions};
pub use subscriptions::{ChangeCallback, ChangeReceiver, Listener, Subscription};
pub use types::*;
