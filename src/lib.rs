//! Rattle - Configuration Views for Sequencing Pipelines
//!
//! Helpers used while defining pipelines for an external orchestration
//! engine. A nested run configuration (samples → read groups → file paths)
//! is wrapped in lazily computed, cached views, and small resolver objects
//! are built for the engine to call with each task's wildcard values.
//!
//! # Architecture
//!
//! - [`config`]: Raw configuration loading and nested lookups
//! - [`memo`]: Compute-once cells backing the cached views
//! - [`units`]: Run / Sample / ReadGroup views and unit names
//! - [`paths`]: Path templates, wildcards and input resolvers
//! - [`plan`]: Dry-run rendering of per-unit commands
//!
//! # Example
//!
//! ```rust,no_run
//! use rattle::{Level, Run, Wildcards};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let run = Run::from_file("config.yml")?.with_output_dir("results");
//!     let r1 = run.config_input_func(Level::ReadGroup, "r1");
//!
//!     for unit in run.unit_names() {
//!         let wildcards = Wildcards::for_unit(unit);
//!         println!(
//!             "{:?} -> {}",
//!             r1.resolve(&wildcards)?,
//!             run.output_for("{sample}/{read_group}.bam", &wildcards)?
//!         );
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod memo;
pub mod paths;
pub mod plan;
pub mod units;

// Re-export commonly used types
pub use config::load_config;
pub use error::{RattleError, Result};
pub use paths::{Expander, GatherResolver, InputFunction, InputResolver, Level, Wildcards};
pub use units::{ReadGroup, Run, Sample, UnitName};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "rattle";
