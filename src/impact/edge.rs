//! Classification of a direct upstream -> downstream edge

use crate::model::{Dependency, Module, Scope};
use std::fmt;

/// How a downstream module consumes an upstream one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Main (compile-visible) consumption; the downstream module is fully affected
    Main,
    /// Consumption only through test scope; the downstream module is affected
    /// as test-only
    Test,
    /// No real consumption; propagation stops
    None,
}

impl EdgeKind {
    /// Test-only flag to propagate with, `None` when propagation stops
    pub fn propagated_test_only(self) -> Option<bool> {
        match self {
            EdgeKind::Main => Some(false),
            EdgeKind::Test => Some(true),
            EdgeKind::None => None,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeKind::Main => "main",
            EdgeKind::Test => "test",
            EdgeKind::None => "none",
        };
        f.write_str(name)
    }
}

/// Classifies how `downstream` consumes `upstream`, the latter having been
/// reached as test-only or not.
pub fn classify(upstream: &Module, upstream_test_only: bool, downstream: &Module) -> EdgeKind {
    if upstream.is_pom() && downstream.parent.as_ref() == Some(&upstream.coordinates) {
        return EdgeKind::Main;
    }

    let declared: Vec<&Dependency> = downstream.dependencies_on(&upstream.coordinates).collect();

    // Most likely a plugin-level reference; never drop a real relationship
    if declared.is_empty() {
        return EdgeKind::Main;
    }

    if !upstream_test_only {
        return scope_kind(&declared);
    }

    let classifiers = upstream.test_jar_classifiers();
    let test_jars: Vec<&Dependency> = declared
        .into_iter()
        .filter(|d| {
            d.effective_classifier()
                .map_or(false, |c| classifiers.iter().any(|tc| tc == c))
        })
        .collect();

    if test_jars.is_empty() {
        return EdgeKind::None;
    }
    scope_kind(&test_jars)
}

fn scope_kind(dependencies: &[&Dependency]) -> EdgeKind {
    let test_scoped_only = dependencies.iter().all(|d| d.scope == Scope::Test);
    let has_placeholder = dependencies.iter().any(|d| d.is_build_order_placeholder());

    if test_scoped_only && !has_placeholder {
        EdgeKind::Test
    } else {
        EdgeKind::Main
    }
}
