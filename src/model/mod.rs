//! Build graph data model

mod gav;
mod module;

pub use gav::{Gav, GavParseError};
pub use module::{
    Dependency, Exclusion, ManagedDependency, Module, Plugin, PluginExecution, Scope,
    DEFAULT_TEST_JAR_CLASSIFIER, POM_PACKAGING, TEST_JAR_TYPE,
};
