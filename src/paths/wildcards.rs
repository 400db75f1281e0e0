//! Wildcard Records
//!
//! The orchestration engine resolves each task with a set of named string
//! values (`sample`, `read_group`, ...). [`Wildcards`] is that record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RattleError, Result};
use crate::units::UnitName;

/// Wildcard carrying the sample name.
pub const SAMPLE_WILDCARD: &str = "sample";

/// Wildcard carrying the read group name.
pub const READ_GROUP_WILDCARD: &str = "read_group";

/// Named wildcard values supplied for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wildcards {
    values: BTreeMap<String, String>,
}

impl Wildcards {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the record identifying one unit.
    pub fn for_unit(unit: &UnitName) -> Self {
        Self::new()
            .with(SAMPLE_WILDCARD, unit.sample.as_str())
            .with(READ_GROUP_WILDCARD, unit.read_group.as_str())
    }

    /// Sets a value, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of a wildcard, if supplied.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the value of a wildcard the caller cannot do without.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| RattleError::MissingWildcard(name.to_string()))
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Wildcards
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Wildcards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", pairs.join(", "))
    }
}
