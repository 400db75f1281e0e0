//! Unit names: the (sample, read group) address of one unit of work.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The (sample, read group) pair addressing one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitName {
    pub sample: String,
    pub read_group: String,
}

impl UnitName {
    pub fn new(sample: impl Into<String>, read_group: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            read_group: read_group.into(),
        }
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sample, self.read_group)
    }
}

impl<S: Into<String>, R: Into<String>> From<(S, R)> for UnitName {
    fn from((sample, read_group): (S, R)) -> Self {
        Self::new(sample, read_group)
    }
}
