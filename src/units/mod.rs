//! Configuration Views
//!
//! A [`Run`] wraps the raw configuration once; it derives its [`Sample`]s,
//! which derive their [`ReadGroup`]s. Every derived collection is computed
//! on first access and cached. All views share the same raw tree.

pub mod read_group;
pub mod run;
pub mod sample;
pub mod unit_name;

pub use read_group::ReadGroup;
pub use run::Run;
pub use sample::Sample;
pub use unit_name::UnitName;

use serde_json::Value;

/// Fallback for config slices that are absent from the tree.
static NULL: Value = Value::Null;
