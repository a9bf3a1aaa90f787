//! Record view of state and shallow diffing.
//!
//! State is compared in its serialized record form: a JSON object keyed
//! by top-level field name. Only the first level is compared; a change
//! anywhere inside a nested value reports the whole nested value.

mod diff;

pub use diff::{diff, diff_records, to_record};
