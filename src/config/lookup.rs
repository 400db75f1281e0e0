//! Nested Lookup
//!
//! Walks a path of keys and indices through a configuration tree.
//! A step that cannot be taken ends the walk with the caller's fallback;
//! nothing here panics or errors.

use std::fmt;

use serde_json::Value;

/// One step of a lookup path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Sequence position.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&String> for PathSegment {
    fn from(key: &String) -> Self {
        Self::Key(key.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Returns the value at `path` below `root`, or `None` if any step is missing.
///
/// - On a mapping, a key descends into its value; an index descends into
///   the entry whose key is the index's decimal form.
/// - On a sequence, an index smaller than its length descends into that
///   element. Keys never match a sequence.
/// - Scalars have no children.
///
/// An empty path returns `root`.
///
/// # Example
///
/// ```
/// use rattle::config::lookup::{get_nested, PathSegment};
/// use serde_json::json;
///
/// let config = json!({"settings": {"threads": [1, 2, 4]}});
/// let path = ["settings".into(), "threads".into(), PathSegment::Index(2)];
/// assert_eq!(get_nested(&config, &path), Some(&json!(4)));
/// assert_eq!(get_nested(&config, &["missing".into()]), None);
/// ```
pub fn get_nested<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(root, |current, segment| match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    })
}

/// Like [`get_nested`], returning `fallback` when the path cannot be walked.
pub fn get_nested_or<'a>(root: &'a Value, path: &[PathSegment], fallback: &'a Value) -> &'a Value {
    get_nested(root, path).unwrap_or(fallback)
}

/// Splits a dotted path such as `settings.workdir` or `samples.0` into segments.
///
/// A part becomes an index only when it is the canonical decimal form of a
/// number, so `0` and `12` are indices while `007` and `+1` stay keys.
/// Empty parts are skipped.
pub fn parse_path(dotted: &str) -> Vec<PathSegment> {
    dotted
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(index) if index.to_string() == part => PathSegment::Index(index),
            _ => PathSegment::Key(part.to_string()),
        })
        .collect()
}
