//! Sample view and its memoized read groups.

use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;

use super::{ReadGroup, UnitName, NULL};
use crate::config::{get_nested, get_nested_or, PathSegment, READ_GROUPS_KEY, SAMPLES_KEY};
use crate::memo::Memo;

/// Sample-level view over the run configuration.
///
/// Shares the run's raw tree; read groups are derived on first access and
/// cached for the lifetime of the sample.
///
/// Like [`ReadGroup`], a sample keeps no reference to its [`Run`](super::Run),
/// only the shared raw tree. Its read groups carry its name, which
/// [`Run::sample_of`](super::Run::sample_of) resolves back to this view.
#[derive(Debug, Clone)]
pub struct Sample {
    raw: Rc<Value>,
    name: String,
    read_groups: Memo<Vec<ReadGroup>>,
}

impl Sample {
    pub(crate) fn new(raw: Rc<Value>, name: impl Into<String>) -> Self {
        Self {
            raw,
            name: name.into(),
            read_groups: Memo::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sample's slice of the run configuration.
    pub fn config(&self) -> &Value {
        get_nested_or(&self.raw, &self.config_path(), &NULL)
    }

    /// Looks up a sample-level entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut path = self.config_path();
        path.push(key.into());
        get_nested(&self.raw, &path)
    }

    /// Read groups of this sample, in document order.
    pub fn read_groups(&self) -> &[ReadGroup] {
        self.read_groups.get_or_compute(|| {
            let mut path = self.config_path();
            path.push(READ_GROUPS_KEY.into());

            let read_groups: Vec<ReadGroup> = match get_nested(&self.raw, &path) {
                Some(Value::Object(map)) => map
                    .keys()
                    .map(|rg_name| ReadGroup::new(Rc::clone(&self.raw), self.name.as_str(), rg_name.as_str()))
                    .collect(),
                _ => {
                    warn!("Sample '{}' has no '{}' mapping", self.name, READ_GROUPS_KEY);
                    Vec::new()
                }
            };

            debug!("Sample '{}': {} read groups", self.name, read_groups.len());
            read_groups
        })
    }

    pub fn read_group(&self, name: &str) -> Option<&ReadGroup> {
        self.read_groups().iter().find(|rg| rg.name() == name)
    }

    /// Unit names of this sample's read groups.
    pub fn unit_names(&self) -> Vec<UnitName> {
        self.read_groups().iter().map(ReadGroup::unit_name).collect()
    }

    fn config_path(&self) -> Vec<PathSegment> {
        vec![SAMPLES_KEY.into(), self.name.as_str().into()]
    }
}
