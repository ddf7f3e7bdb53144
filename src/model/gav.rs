//! Module coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid coordinates '{0}': expected groupId:artifactId:version")]
pub struct GavParseError(pub String);

/// Stable identity of a module: `groupId:artifactId:version`.
///
/// Serialized in its colon-separated form so snapshots stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// True when `group_id`, `artifact_id` and `version` all equal the given strings.
    pub fn matches(&self, group_id: &str, artifact_id: &str, version: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id && self.version == version
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl FromStr for Gav {
    type Err = GavParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Gav::new(*group, *artifact, *version))
            }
            _ => Err(GavParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Gav {
    type Error = GavParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Gav> for String {
    fn from(gav: Gav) -> Self {
        gav.to_string()
    }
}
