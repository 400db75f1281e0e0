//! Error Types
//!
//! Failures that are fatal to the caller. Lookup misses are not errors:
//! they come back as `None` or as the caller's fallback value.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building views, resolvers and output paths.
#[derive(Debug, Error)]
pub enum RattleError {
    /// A level marker that is neither `sample` nor `read_group`.
    #[error("Invalid 'level' value: '{0}' (expected 'sample' or 'read_group')")]
    InvalidLevel(String),

    /// An output path was requested but no output directory was resolved.
    #[error("'output_dir' is not defined")]
    MissingOutputDir,

    /// A resolver needed a wildcard the engine did not supply.
    #[error("Wildcard '{{{0}}}' was not supplied")]
    MissingWildcard(String),

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RattleError>;
