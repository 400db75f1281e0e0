//! Raw Configuration
//!
//! The run configuration is an unvalidated tree of mappings, sequences and
//! scalars, held as a [`serde_json::Value`] with insertion-ordered maps.
//!
//! # Expected Layout
//!
//! ```yaml
//! output_dir: results
//! settings:
//!   workdir: /data/analysis
//! samples:
//!   sample01:
//!     read_groups:
//!       rg01:
//!         r1: /data/reads/sample01_R1.fq.gz
//!         r2: /data/reads/sample01_R2.fq.gz
//! ```
//!
//! - [`lookup`]: path walking with fallbacks
//! - [`loader`]: reading documents from disk

pub mod loader;
pub mod lookup;

pub use loader::{load_config, parse_config};
pub use lookup::{get_nested, get_nested_or, parse_path, PathSegment};

/// Top-level mapping of sample name to sample config.
pub const SAMPLES_KEY: &str = "samples";

/// Per-sample mapping of read group name to read group config.
pub const READ_GROUPS_KEY: &str = "read_groups";

/// Top-level mapping of run settings.
pub const SETTINGS_KEY: &str = "settings";

/// Working directory entry inside `settings`.
pub const WORKDIR_KEY: &str = "workdir";

/// Top-level output directory entry.
pub const OUTPUT_DIR_KEY: &str = "output_dir";
