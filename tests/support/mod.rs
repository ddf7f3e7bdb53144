//! Shared fixtures for integration tests

#![allow(dead_code)]

use impactbox::fs::MockFileSystem;
use impactbox::model::{Dependency, Gav, Module};
use impactbox::Reactor;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const GROUP: &str = "com.acme";
pub const VERSION: &str = "1.0.0";

pub fn gav(artifact_id: &str) -> Gav {
    Gav::new(GROUP, artifact_id, VERSION)
}

/// A jar module under `/repo/<artifact_id>` depending on `deps`
pub fn module(artifact_id: &str, deps: &[&str]) -> Module {
    deps.iter().fold(
        Module::new(gav(artifact_id), format!("/repo/{}", artifact_id)),
        |m, d| m.with_dependency(Dependency::new(gav(d))),
    )
}

pub fn names(modules: &[Gav]) -> Vec<&str> {
    modules.iter().map(|g| g.artifact_id.as_str()).collect()
}

/// Reactor rooted at `/repo`
pub fn reactor(modules: Vec<Module>) -> Reactor {
    Reactor::new(modules)
        .expect("valid reactor")
        .with_root_dir("/repo")
}

/// Mock filesystem with a descriptor in `/repo` and in every module directory
pub fn descriptors_for(graph: &Reactor) -> Arc<MockFileSystem> {
    use impactbox::graph::BuildGraph;

    let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
    fs.add_file("/repo/pom.xml");
    for module in graph.all_modules() {
        fs.add_file(module.base_dir.join("pom.xml"));
    }
    Arc::new(fs)
}

/// Writes a multi-module layout with real descriptors below `root` and
/// returns a YAML reactor snapshot describing it:
///
/// parent (pom) <- core <- service <- web (war), plus an independent `docs`
pub fn write_maven_tree(root: &Path) -> String {
    for dir in ["", "core", "service", "web", "docs"] {
        let module_dir = root.join(dir);
        fs::create_dir_all(module_dir.join("src/main/java")).expect("create module dir");
        fs::write(module_dir.join("pom.xml"), "<project/>\n").expect("write pom.xml");
    }

    let root = root.display();
    format!(
        r#"modules:
  - coordinates: "com.acme:parent:1.0.0"
    baseDir: "{root}"
    packaging: pom
    submodules: [core, service, web, docs]
  - coordinates: "com.acme:core:1.0.0"
    baseDir: "{root}/core"
    parent: "com.acme:parent:1.0.0"
  - coordinates: "com.acme:service:1.0.0"
    baseDir: "{root}/service"
    parent: "com.acme:parent:1.0.0"
    dependencies:
      - coordinates: "com.acme:core:1.0.0"
  - coordinates: "com.acme:web:1.0.0"
    baseDir: "{root}/web"
    packaging: war
    parent: "com.acme:parent:1.0.0"
    dependencies:
      - coordinates: "com.acme:service:1.0.0"
  - coordinates: "com.acme:docs:1.0.0"
    baseDir: "{root}/docs"
    parent: "com.acme:parent:1.0.0"
session:
  rootDir: "{root}"
  goals: [install]
"#
    )
}

pub fn get_impactbox_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_impactbox"))
}
