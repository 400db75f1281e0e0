//! Read group view, the finest level of the run configuration.

use std::rc::Rc;

use serde_json::Value;

use super::{UnitName, NULL};
use crate::config::{get_nested, get_nested_or, PathSegment, READ_GROUPS_KEY, SAMPLES_KEY};

/// Read group-level view: the finest configuration unit, holding file paths.
///
/// A read group does not point at its [`Sample`](super::Sample). It holds the
/// shared raw tree and its sample's name; [`Run::sample_of`](super::Run::sample_of)
/// turns that name back into the sample view.
#[derive(Debug, Clone)]
pub struct ReadGroup {
    raw: Rc<Value>,
    sample: String,
    name: String,
}

impl ReadGroup {
    pub(crate) fn new(raw: Rc<Value>, sample: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            raw,
            sample: sample.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the sample this read group belongs to.
    pub fn sample_name(&self) -> &str {
        &self.sample
    }

    pub fn unit_name(&self) -> UnitName {
        UnitName::new(self.sample.as_str(), self.name.as_str())
    }

    /// The read group's slice of the run configuration.
    pub fn config(&self) -> &Value {
        get_nested_or(&self.raw, &self.config_path(), &NULL)
    }

    /// Looks up one entry of the read group config, e.g. `r1`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut path = self.config_path();
        path.push(key.into());
        get_nested(&self.raw, &path)
    }

    fn config_path(&self) -> Vec<PathSegment> {
        vec![
            SAMPLES_KEY.into(),
            self.sample.as_str().into(),
            READ_GROUPS_KEY.into(),
            self.name.as_str().into(),
        ]
    }
}
