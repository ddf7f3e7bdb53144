//! Changed paths and their mapping onto modules
//!
//! Collecting the raw paths (diffing refs, working-tree status) is the job of
//! a [`ChangeSource`]; this crate only consumes the resulting [`ChangeSet`].

mod mapper;

pub use mapper::{ChangeMapper, ChangedModules, MODULE_DESCRIPTOR, SOURCE_ROOT};

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Set of changed filesystem paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reads one path per line; blank lines and `#` comments are skipped
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut changes = Self::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            changes.insert(trimmed);
        }
        Ok(changes)
    }

    /// Makes relative paths absolute against `root`
    pub fn resolve_against(self, root: &Path) -> Self {
        self.paths
            .into_iter()
            .map(|p| if p.is_absolute() { p } else { root.join(p) })
            .collect()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChangeSourceError {
    /// Nothing meaningful to compare against (e.g. no commits or no remotes yet)
    #[error("{0}")]
    Skip(String),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Supplier of changed paths, typically backed by version control
pub trait ChangeSource {
    fn changed_paths(&self) -> Result<ChangeSet, ChangeSourceError>;
}

/// Change source over a fixed set of paths
#[derive(Debug, Clone, Default)]
pub struct StaticChangeSource {
    changes: ChangeSet,
}

impl StaticChangeSource {
    pub fn new(changes: ChangeSet) -> Self {
        Self { changes }
    }
}

impl ChangeSource for StaticChangeSource {
    fn changed_paths(&self) -> Result<ChangeSet, ChangeSourceError> {
        Ok(self.changes.clone())
    }
}
