//! Module model as supplied by the host build graph

use super::Gav;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const POM_PACKAGING: &str = "pom";
pub const TEST_JAR_TYPE: &str = "test-jar";
pub const DEFAULT_TEST_JAR_CLASSIFIER: &str = "tests";

const JAR_PLUGIN_ARTIFACT_ID: &str = "maven-jar-plugin";
const TEST_JAR_GOAL: &str = "test-jar";
const WILDCARD: &str = "*";

fn default_packaging() -> String {
    "jar".to_string()
}

fn default_type() -> String {
    "jar".to_string()
}

/// Dependency scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    System,
    Test,
    Import,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Provided => "provided",
            Scope::System => "system",
            Scope::Test => "test",
            Scope::Import => "import",
        };
        f.write_str(name)
    }
}

/// A `groupId:artifactId` exclusion on a dependency, `*` acting as wildcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn is_full_wildcard(&self) -> bool {
        self.group_id == WILDCARD && self.artifact_id == WILDCARD
    }
}

/// Declared dependency of a module (resolved model)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub coordinates: Gav,
    #[serde(default)]
    pub scope: Scope,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    pub fn new(coordinates: Gav) -> Self {
        Self {
            coordinates,
            scope: Scope::Compile,
            kind: default_type(),
            classifier: None,
            exclusions: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Classifier used for matching; an unset classifier on a `test-jar`
    /// dependency means the conventional `tests` classifier.
    pub fn effective_classifier(&self) -> Option<&str> {
        match self.classifier.as_deref() {
            Some(classifier) => Some(classifier),
            None if self.kind == TEST_JAR_TYPE => Some(DEFAULT_TEST_JAR_CLASSIFIER),
            None => None,
        }
    }

    /// A `pom`-typed, test-scoped dependency excluding `*:*`, declared only to
    /// force reactor ordering without consuming anything.
    pub fn is_build_order_placeholder(&self) -> bool {
        self.kind == POM_PACKAGING
            && self.scope == Scope::Test
            && self.exclusions.len() == 1
            && self.exclusions[0].is_full_wildcard()
    }
}

/// Execution of a build plugin, reduced to what matters for test-jar detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginExecution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

/// Build plugin declared by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    #[serde(default)]
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executions: Vec<PluginExecution>,
}

impl Plugin {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            executions: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_execution(mut self, execution: PluginExecution) -> Self {
        self.executions.push(execution);
        self
    }

    /// Whether this plugin refers to the given module's coordinates
    pub fn refers_to(&self, gav: &Gav) -> bool {
        self.group_id == gav.group_id
            && self.artifact_id == gav.artifact_id
            && self.version.as_deref().map_or(true, |v| v == gav.version)
    }
}

/// Entry of the original (uninterpolated, uninherited) dependency management
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl ManagedDependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            kind: default_type(),
            scope: None,
        }
    }

    /// A `pom`-typed, `import`-scoped bill-of-materials entry
    pub fn bom_import(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            kind: POM_PACKAGING.to_string(),
            scope: Some("import".to_string()),
            ..Self::new(group_id, artifact_id, version)
        }
    }

    pub fn is_bom_import(&self) -> bool {
        self.kind == POM_PACKAGING && self.scope.as_deref() == Some("import")
    }
}

/// A node of the build graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub coordinates: Gav,
    pub base_dir: PathBuf,
    #[serde(default = "default_packaging")]
    pub packaging: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Gav>,
    /// Declared submodule paths (aggregator `<modules>`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original_dependency_management: Vec<ManagedDependency>,
    /// Effective properties; also the write target for build arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Test source tree, relative to `base_dir` unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_source_dir: Option<PathBuf>,
}

impl Module {
    pub fn new(coordinates: Gav, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            coordinates,
            base_dir: base_dir.into(),
            packaging: default_packaging(),
            parent: None,
            submodules: Vec::new(),
            dependencies: Vec::new(),
            plugins: Vec::new(),
            original_dependency_management: Vec::new(),
            properties: BTreeMap::new(),
            test_source_dir: None,
        }
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_parent(mut self, parent: Gav) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_submodules(mut self, submodules: Vec<String>) -> Self {
        self.submodules = submodules;
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_managed_dependency(mut self, managed: ManagedDependency) -> Self {
        self.original_dependency_management.push(managed);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_test_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_source_dir = Some(dir.into());
        self
    }

    pub fn is_pom(&self) -> bool {
        self.packaging == POM_PACKAGING
    }

    pub fn artifact_id(&self) -> &str {
        &self.coordinates.artifact_id
    }

    /// Absolute test source tree of this module
    pub fn test_source_root(&self) -> PathBuf {
        match &self.test_source_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.base_dir.join(dir),
            None => self.base_dir.join("src").join("test"),
        }
    }

    pub fn is_test_path(&self, path: &Path) -> bool {
        path.starts_with(self.test_source_root())
    }

    /// Dependencies declared on exactly the given coordinates
    pub fn dependencies_on<'a>(&'a self, gav: &'a Gav) -> impl Iterator<Item = &'a Dependency> {
        self.dependencies
            .iter()
            .filter(move |d| &d.coordinates == gav)
    }

    /// Classifiers of the test-jars this module produces, derived from
    /// `maven-jar-plugin` executions bound to the `test-jar` goal.
    pub fn test_jar_classifiers(&self) -> Vec<String> {
        let mut classifiers: Vec<String> = Vec::new();
        for plugin in self
            .plugins
            .iter()
            .filter(|p| p.artifact_id == JAR_PLUGIN_ARTIFACT_ID)
        {
            for execution in plugin
                .executions
                .iter()
                .filter(|e| e.goals.iter().any(|g| g == TEST_JAR_GOAL))
            {
                let classifier = execution
                    .classifier
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TEST_JAR_CLASSIFIER.to_string());
                if !classifiers.contains(&classifier) {
                    classifiers.push(classifier);
                }
            }
        }
        classifiers
    }

    pub fn declares_test_jar_goal(&self) -> bool {
        !self.test_jar_classifiers().is_empty()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gav(a: &str) -> Gav {
        Gav::new("g", a, "1")
    }

    #[test]
    fn test_effective_classifier_for_test_jar() {
        let dep = Dependency::new(gav("a")).with_type(TEST_JAR_TYPE);
        assert_eq!(dep.effective_classifier(), Some("tests"));

        let dep = Dependency::new(gav("a"))
            .with_type(TEST_JAR_TYPE)
            .with_classifier("it");
        assert_eq!(dep.effective_classifier(), Some("it"));

        let dep = Dependency::new(gav("a"));
        assert_eq!(dep.effective_classifier(), None);
    }

    #[test]
    fn test_build_order_placeholder() {
        let placeholder = Dependency::new(gav("a"))
            .with_type("pom")
            .with_scope(Scope::Test)
            .with_exclusion(Exclusion::new("*", "*"));
        assert!(placeholder.is_build_order_placeholder());

        let partial = Dependency::new(gav("a"))
            .with_type("pom")
            .with_scope(Scope::Test)
            .with_exclusion(Exclusion::new("org.foo", "*"));
        assert!(!partial.is_build_order_placeholder());

        let compile = Dependency::new(gav("a"))
            .with_type("pom")
            .with_exclusion(Exclusion::new("*", "*"));
        assert!(!compile.is_build_order_placeholder());
    }

    #[test]
    fn test_test_jar_classifiers() {
        let module = Module::new(gav("a"), "/r/a").with_plugin(
            Plugin::new("org.apache.maven.plugins", "maven-jar-plugin")
                .with_execution(PluginExecution {
                    id: Some("default".to_string()),
                    goals: vec!["test-jar".to_string()],
                    classifier: None,
                })
                .with_execution(PluginExecution {
                    id: Some("it".to_string()),
                    goals: vec!["test-jar".to_string()],
                    classifier: Some("it-tests".to_string()),
                }),
        );
        assert_eq!(module.test_jar_classifiers(), vec!["tests", "it-tests"]);
        assert!(module.declares_test_jar_goal());

        let plain = Module::new(gav("b"), "/r/b");
        assert!(plain.test_jar_classifiers().is_empty());
    }

    #[test]
    fn test_test_source_root() {
        let module = Module::new(gav("a"), "/r/a");
        assert_eq!(module.test_source_root(), PathBuf::from("/r/a/src/test"));
        assert!(module.is_test_path(Path::new("/r/a/src/test/java/FooTest.java")));
        assert!(!module.is_test_path(Path::new("/r/a/src/main/java/Foo.java")));

        let custom = Module::new(gav("b"), "/r/b").with_test_source_dir("tests");
        assert_eq!(custom.test_source_root(), PathBuf::from("/r/b/tests"));
    }

    #[test]
    fn test_bom_import_detection() {
        assert!(ManagedDependency::bom_import("g", "bom", "${project.version}").is_bom_import());
        assert!(!ManagedDependency::new("g", "lib", "1").is_bom_import());
    }

    #[test]
    fn test_plugin_refers_to() {
        let target = gav("tool");
        assert!(Plugin::new("g", "tool").refers_to(&target));
        assert!(Plugin::new("g", "tool").with_version("1").refers_to(&target));
        assert!(!Plugin::new("g", "tool").with_version("2").refers_to(&target));
    }
}
