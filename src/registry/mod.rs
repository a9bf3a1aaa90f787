//! Named registries of mutation and getter functions.
//!
//! Both registries map a name to a boxed function with a fixed call
//! signature. Lookup is by exact name.

mod getters;
mod mutations;

pub use getters::{GetterFn, Getters};
pub use mutations::{MutationFn, Mutations};
