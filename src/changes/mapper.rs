//! Change-to-module mapping

use super::ChangeSet;
use crate::fs::FileSystem;
use crate::graph::BuildGraph;
use crate::model::{Gav, Module};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MODULE_DESCRIPTOR: &str = "pom.xml";
pub const SOURCE_ROOT: &str = "src";

/// Changed modules with their test-only annotation.
///
/// A module stays test-only only while every change attributed to it lies in
/// its test source tree; the first other change pins it to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedModules {
    modules: BTreeMap<Gav, bool>,
}

impl ChangedModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, module: Gav, test_only_change: bool) {
        let flag = self.modules.entry(module).or_insert(true);
        *flag = *flag && test_only_change;
    }

    pub fn contains(&self, module: &Gav) -> bool {
        self.modules.contains_key(module)
    }

    /// `false` for modules that are not marked at all
    pub fn is_test_only(&self, module: &Gav) -> bool {
        self.modules.get(module).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Gav, bool)> {
        self.modules.iter().map(|(gav, flag)| (gav, *flag))
    }

    pub fn ids(&self) -> impl Iterator<Item = &Gav> {
        self.modules.keys()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<(Gav, bool)> for ChangedModules {
    fn from_iter<I: IntoIterator<Item = (Gav, bool)>>(iter: I) -> Self {
        let mut changed = Self::new();
        for (module, test_only) in iter {
            changed.mark(module, test_only);
        }
        changed
    }
}

/// Maps changed paths to the modules owning them
pub struct ChangeMapper<'a> {
    fs: &'a dyn FileSystem,
    by_dir: HashMap<PathBuf, Vec<&'a Module>>,
}

impl<'a> ChangeMapper<'a> {
    pub fn new(graph: &'a dyn BuildGraph, fs: &'a dyn FileSystem) -> Self {
        let mut by_dir: HashMap<PathBuf, Vec<&'a Module>> = HashMap::new();
        for module in graph.all_modules() {
            by_dir
                .entry(module.base_dir.clone())
                .or_default()
                .push(module);
        }
        Self { fs, by_dir }
    }

    pub fn map(&self, changes: &ChangeSet) -> ChangedModules {
        let mut changed = ChangedModules::new();
        for path in changes.iter() {
            for module in self.owners(path) {
                let test_only = module.is_test_path(path);
                debug!(
                    path = %path.display(),
                    module = %module.coordinates,
                    test_only,
                    "Mapped change"
                );
                changed.mark(module.coordinates.clone(), test_only);
            }
        }
        changed
    }

    /// Modules owning `path`; empty when the path is outside the build
    pub fn owners(&self, path: &Path) -> Vec<&'a Module> {
        for dir in path.ancestors() {
            if let Some(modules) = self.by_dir.get(dir) {
                return modules.clone();
            }

            if let Some(owner) = self.unwrap_source_root(dir) {
                if let Some(modules) = self.by_dir.get(owner) {
                    return modules.clone();
                }
                if !self.within_source_tree(owner) {
                    warn!(
                        path = %path.display(),
                        project = %owner.display(),
                        "Ignoring change in a project that is not part of the build"
                    );
                    return Vec::new();
                }
            }

            if self.fs.contains_file(dir, MODULE_DESCRIPTOR) && !self.within_source_tree(dir) {
                warn!(
                    path = %path.display(),
                    project = %dir.display(),
                    "Ignoring change in a project that is not part of the build"
                );
                return Vec::new();
            }
        }

        warn!(path = %path.display(), "Ignoring change outside of the build");
        Vec::new()
    }

    /// `<project>/src` without its own descriptor resolves to `<project>`
    fn unwrap_source_root<'p>(&self, dir: &'p Path) -> Option<&'p Path> {
        if dir.file_name().and_then(|n| n.to_str()) != Some(SOURCE_ROOT) {
            return None;
        }
        if self.fs.contains_file(dir, MODULE_DESCRIPTOR) {
            return None;
        }
        dir.parent()
            .filter(|owner| self.fs.contains_file(owner, MODULE_DESCRIPTOR))
    }

    /// Whether `dir` sits below some project's source root, i.e. is an
    /// embedded, independent build
    fn within_source_tree(&self, dir: &Path) -> bool {
        dir.ancestors().skip(1).any(|ancestor| {
            ancestor.file_name().and_then(|n| n.to_str()) == Some(SOURCE_ROOT)
                && ancestor
                    .parent()
                    .map_or(false, |p| self.fs.contains_file(p, MODULE_DESCRIPTOR))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::graph::Reactor;
    use crate::model::Dependency;

    fn gav(a: &str) -> Gav {
        Gav::new("g", a, "1")
    }

    fn reactor() -> Reactor {
        Reactor::new(vec![
            Module::new(gav("parent"), "/repo").with_packaging("pom"),
            Module::new(gav("core"), "/repo/core"),
            Module::new(gav("app"), "/repo/app").with_dependency(Dependency::new(gav("core"))),
        ])
        .unwrap()
    }

    fn filesystem() -> MockFileSystem {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("pom.xml");
        fs.add_file("core/pom.xml");
        fs.add_file("app/pom.xml");
        fs
    }

    fn changes(paths: &[&str]) -> ChangeSet {
        paths.iter().copied().collect()
    }

    #[test]
    fn test_maps_to_nearest_module() {
        let graph = reactor();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        let changed = mapper.map(&changes(&["/repo/core/src/main/java/Core.java"]));
        assert_eq!(changed.ids().collect::<Vec<_>>(), vec![&gav("core")]);
        assert!(!changed.is_test_only(&gav("core")));
    }

    #[test]
    fn test_root_files_map_to_root_module() {
        let graph = reactor();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        let changed = mapper.map(&changes(&["/repo/README.md"]));
        assert!(changed.contains(&gav("parent")));
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn test_outside_build_is_dropped() {
        let graph = reactor();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        assert!(mapper.map(&changes(&["/elsewhere/file.txt"])).is_empty());
    }

    #[test]
    fn test_non_reactor_project_is_dropped() {
        let graph = reactor();
        let fs = filesystem();
        fs.add_file("tools/pom.xml");
        let mapper = ChangeMapper::new(&graph, &fs);

        assert!(mapper.map(&changes(&["/repo/tools/src/main/Tool.java"])).is_empty());
    }

    #[test]
    fn test_embedded_build_maps_to_enclosing_module() {
        let graph = reactor();
        let fs = filesystem();
        fs.add_file("core/src/test/resources/sample/pom.xml");
        let mapper = ChangeMapper::new(&graph, &fs);

        let changed = mapper.map(&changes(&[
            "/repo/core/src/test/resources/sample/src/main/java/Sample.java",
        ]));
        assert_eq!(changed.ids().collect::<Vec<_>>(), vec![&gav("core")]);
        assert!(changed.is_test_only(&gav("core")));
    }

    #[test]
    fn test_source_root_unwraps_to_owning_project() {
        let graph = reactor();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        let owners = mapper.owners(Path::new("/repo/app/src/main/resources/app.properties"));
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].coordinates, gav("app"));
    }

    #[test]
    fn test_test_only_flag_degrades_permanently() {
        let graph = reactor();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        let test_only = mapper.map(&changes(&[
            "/repo/core/src/test/java/CoreTest.java",
            "/repo/core/src/test/resources/data.json",
        ]));
        assert!(test_only.is_test_only(&gav("core")));

        let mixed = mapper.map(&changes(&[
            "/repo/core/src/test/java/CoreTest.java",
            "/repo/core/src/main/java/Core.java",
        ]));
        assert!(!mixed.is_test_only(&gav("core")));
    }

    #[test]
    fn test_modules_sharing_a_directory() {
        let graph = Reactor::new(vec![
            Module::new(gav("parent"), "/repo").with_packaging("pom"),
            Module::new(gav("aggregator"), "/repo").with_packaging("pom"),
        ])
        .unwrap();
        let fs = filesystem();
        let mapper = ChangeMapper::new(&graph, &fs);

        let changed = mapper.map(&changes(&["/repo/pom.xml"]));
        assert_eq!(changed.len(), 2);
    }

    #[test]
    fn test_changed_modules_mark() {
        let mut changed = ChangedModules::new();
        changed.mark(gav("a"), false);
        changed.mark(gav("a"), true);
        assert!(!changed.is_test_only(&gav("a")));
        assert!(!changed.is_test_only(&gav("missing")));
    }
}
