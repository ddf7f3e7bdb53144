use super::FileSystem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// In-memory set of descriptor files
pub struct MockFileSystem {
    files: RwLock<HashSet<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    /// Relative paths passed to [`add_file`](Self::add_file) resolve against `root`
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashSet::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&path)
    }
}
