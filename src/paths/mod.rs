//! Path Factories
//!
//! Helpers that build file paths for the orchestration engine.
//!
//! - [`template`]: `{name}` placeholder parsing and substitution
//! - [`wildcards`]: per-task wildcard records
//! - [`expand`]: the pluggable pattern expander
//! - [`resolver`]: deferred input lookups called by the engine

pub mod expand;
pub mod resolver;
pub mod template;
pub mod wildcards;

pub use expand::{Expander, ProductExpander, Substitutions};
pub use resolver::{GatherResolver, InputFunction, InputResolver, Level};
pub use template::{has_placeholders, placeholder_names, substitute};
pub use wildcards::{Wildcards, READ_GROUP_WILDCARD, SAMPLE_WILDCARD};
