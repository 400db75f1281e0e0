//! Input Resolvers
//!
//! Resolvers are built while the workflow is being defined and called later
//! by the orchestration engine, once per task, with that task's wildcards.
//! Each one keeps a shared handle on the raw configuration so the lookup
//! happens at call time.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::expand::{Expander, Substitutions};
use super::template::placeholder_key;
use super::wildcards::{Wildcards, READ_GROUP_WILDCARD, SAMPLE_WILDCARD};
use crate::config::{get_nested, PathSegment, READ_GROUPS_KEY, SAMPLES_KEY};
use crate::error::{RattleError, Result};

/// Configuration level an input resolver reads its key from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// `samples.<sample>.<key>`
    Sample,
    /// `samples.<sample>.read_groups.<read_group>.<key>`
    ReadGroup,
}

impl FromStr for Level {
    type Err = RattleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sample" | "Sample" => Ok(Self::Sample),
            "read_group" | "read-group" | "ReadGroup" | "rg" => Ok(Self::ReadGroup),
            other => Err(RattleError::InvalidLevel(other.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => write!(f, "sample"),
            Self::ReadGroup => write!(f, "read_group"),
        }
    }
}

/// Anything the engine can call to obtain a task's input paths.
pub trait InputFunction {
    fn inputs(&self, wildcards: &Wildcards) -> Result<Vec<String>>;
}

/// Resolves one config entry for the task's sample or read group.
///
/// A key written as `{name}` is itself taken from the wildcard `name`
/// when the resolver is called.
#[derive(Debug, Clone)]
pub struct InputResolver {
    raw: Rc<Value>,
    level: Level,
    key: String,
}

impl InputResolver {
    pub(crate) fn new(raw: Rc<Value>, level: Level, key: impl Into<String>) -> Self {
        Self {
            raw,
            level,
            key: key.into(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configured value, or `None` if any step of the lookup misses.
    ///
    /// Fails only when a wildcard the lookup depends on was not supplied.
    pub fn resolve(&self, wildcards: &Wildcards) -> Result<Option<Value>> {
        let path = self.lookup_path(wildcards)?;
        let found = get_nested(&self.raw, &path).cloned();

        debug!(
            "Resolved {} key '{}' for [{}]: {}",
            self.level,
            self.key,
            wildcards,
            found.as_ref().map_or_else(|| "<missing>".to_string(), Value::to_string)
        );

        Ok(found)
    }

    fn lookup_path(&self, wildcards: &Wildcards) -> Result<Vec<PathSegment>> {
        let mut path: Vec<PathSegment> =
            vec![SAMPLES_KEY.into(), wildcards.require(SAMPLE_WILDCARD)?.into()];

        if self.level == Level::ReadGroup {
            path.push(READ_GROUPS_KEY.into());
            path.push(wildcards.require(READ_GROUP_WILDCARD)?.into());
        }

        let key = match placeholder_key(&self.key) {
            Some(name) => wildcards.require(name)?,
            None => self.key.as_str(),
        };
        path.push(key.into());

        Ok(path)
    }
}

impl InputFunction for InputResolver {
    fn inputs(&self, wildcards: &Wildcards) -> Result<Vec<String>> {
        Ok(self
            .resolve(wildcards)?
            .map(|value| value_to_paths(&value))
            .unwrap_or_default())
    }
}

/// Flattens a resolved value into path strings.
fn value_to_paths(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(value_to_paths).collect(),
        Value::Object(map) => map.values().flat_map(value_to_paths).collect(),
        other => vec![other.to_string()],
    }
}

/// Gathers one path per read group of the task's sample.
pub struct GatherResolver {
    raw: Rc<Value>,
    pattern: String,
    extra: Vec<(String, String)>,
    expander: Rc<dyn Expander>,
}

impl GatherResolver {
    pub(crate) fn new<I, K, V>(raw: Rc<Value>, pattern: impl Into<String>, extra: I, expander: Rc<dyn Expander>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            raw,
            pattern: pattern.into(),
            extra: extra.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            expander,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Expands the pattern over every read group of `wildcards.sample`.
    ///
    /// An unknown sample has no read groups and therefore gathers nothing.
    pub fn resolve(&self, wildcards: &Wildcards) -> Result<Vec<String>> {
        let sample = wildcards.require(SAMPLE_WILDCARD)?;
        let path: Vec<PathSegment> = vec![SAMPLES_KEY.into(), sample.into(), READ_GROUPS_KEY.into()];

        let read_groups: Vec<&String> = match get_nested(&self.raw, &path) {
            Some(Value::Object(map)) => map.keys().collect(),
            _ => Vec::new(),
        };

        let substitutions = self.extra.iter().fold(
            Substitutions::new()
                .with_value(SAMPLE_WILDCARD, sample)
                .with(READ_GROUP_WILDCARD, read_groups.iter().map(|rg| rg.as_str())),
            |subs, (name, value)| subs.with_value(name.as_str(), value.as_str()),
        );

        let paths = self.expander.expand(&self.pattern, &substitutions);
        debug!(
            "Gathered {} paths from '{}' for sample '{}'",
            paths.len(),
            self.pattern,
            sample
        );

        Ok(paths)
    }
}

impl InputFunction for GatherResolver {
    fn inputs(&self, wildcards: &Wildcards) -> Result<Vec<String>> {
        self.resolve(wildcards)
    }
}

impl fmt::Debug for GatherResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatherResolver")
            .field("pattern", &self.pattern)
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}
