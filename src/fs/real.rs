use super::FileSystem;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_real_probing() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir(base.join("core")).unwrap();
        fs::write(base.join("core/pom.xml"), "<project/>").unwrap();

        let fs = RealFileSystem::new();
        assert!(fs.contains_file(&base.join("core"), "pom.xml"));
        assert!(!fs.contains_file(base, "pom.xml"));
        assert!(!fs.is_file(&base.join("core")));
    }
}
