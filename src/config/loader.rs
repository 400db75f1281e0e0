//! Config Loader
//!
//! Reads a run configuration document from disk. YAML is the native format;
//! JSON documents load too since YAML is a superset of JSON.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use super::SAMPLES_KEY;
use crate::error::{RattleError, Result};

/// Loads a configuration document into a raw config tree.
///
/// The document is not validated beyond being well-formed; a missing
/// `samples` mapping only produces a warning.
///
/// # Example
///
/// ```rust,no_run
/// use rattle::config::load_config;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let raw = load_config("config.yml")?;
///     println!("{}", raw["samples"]);
///     Ok(())
/// }
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    info!("Loading config from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| RattleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Config content loaded ({} bytes)", content.len());

    parse_document(&content, path.to_path_buf())
}

/// Parses configuration text that did not come from a file.
pub fn parse_config(content: &str) -> Result<Value> {
    parse_document(content, PathBuf::from("<string>"))
}

fn parse_document(content: &str, origin: PathBuf) -> Result<Value> {
    let raw: Value = serde_yaml::from_str(content).map_err(|source| RattleError::Parse {
        path: origin.clone(),
        source,
    })?;

    match raw.get(SAMPLES_KEY).and_then(Value::as_object) {
        Some(samples) => info!("Parsed config with {} samples", samples.len()),
        None => warn!(
            "Config '{}' has no '{}' mapping",
            origin.display(),
            SAMPLES_KEY
        ),
    }

    Ok(raw)
}
