//! Change subscription for a store.
//!
//! A store holds at most one subscription: a callback plus an optional
//! list of watched top-level keys. After every commit the callback is
//! handed the previous state and the diff:
//! - No watched keys: called once per commit.
//! - Watched keys: called once for each watched key present in the diff,
//!   so a commit touching two watched keys calls it twice.
//!
//! Disabling keeps the subscription; it can be re-enabled later.
//!
//! # Example
//!
//! ```ignore
//! store.subscribe_events(|prev, changes| {
//!     println!("count was {}, changed: {:?}", prev.count, changes);
//! }, ["count"]);
//!
//! store.commit_with("increment", &1)?;
//!
//! // Or receive changes through a channel
//! let changes = store.subscribe_channel(Vec::<String>::new());
//! store.commit_with("increment", &1)?;
//! let change = changes.try_recv()?;
//! ```

mod manager;
mod types;

pub use manager::Listener;
pub use types::{ChangeCallback, ChangeReceiver, Subscription};
