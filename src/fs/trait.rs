//! FileSystem trait definition

use std::path::Path;

/// Abstraction over file system queries for testability
pub trait FileSystem: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;

    /// Check whether `dir` directly contains a file called `name`
    fn contains_file(&self, dir: &Path, name: &str) -> bool {
        self.is_file(&dir.join(name))
    }
}
