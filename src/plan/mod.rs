//! Build plan assembly
//!
//! The assembler only reads the build graph. Everything it decides is
//! collected in a [`BuildPlan`], which is committed to the graph in one step
//! by [`BuildPlan::apply`].

mod args;
mod assembler;
mod force;
mod impact_log;
mod order;

pub use args::{downstream_args, upstream_args, SKIP_TESTS, SKIP_TEST_COMPILATION};
pub use assembler::PlanAssembler;
pub use force::forced_modules;
pub use impact_log::{render_impacted, write_impacted_log};
pub use order::sort_by_reactor_order;

use crate::graph::BuildGraph;
use crate::model::Gav;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub const VALIDATE_GOAL: &str = "validate";

/// Which branch produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanOutcome {
    /// Resolution is switched off
    Disabled,
    /// The session already builds exactly the selected modules
    SelectionUnchanged,
    /// Non-recursive build or a single leaf module
    NonRecursive,
    /// No changes; the selection and its dependents are built
    NoChangesSelected,
    /// No changes; every session module is built
    NoChangesBuildAll,
    /// No changes; only the current module is validated
    NoChangesValidate,
    /// The session is trimmed to the modules that need a rebuild
    Incremental,
    /// The session is kept; modules not impacted get upstream arguments
    BuildAll,
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            PlanOutcome::Disabled => "disabled",
            PlanOutcome::SelectionUnchanged => "selection unchanged",
            PlanOutcome::NonRecursive => "non-recursive build",
            PlanOutcome::NoChangesSelected => "no changes, building selection",
            PlanOutcome::NoChangesBuildAll => "no changes, building all",
            PlanOutcome::NoChangesValidate => "no changes, validating current module",
            PlanOutcome::Incremental => "incremental",
            PlanOutcome::BuildAll => "build all",
        };
        f.write_str(description)
    }
}

/// Result of one resolution, not yet committed to the build graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub outcome: PlanOutcome,
    /// Modules mapped from the changed paths
    pub changed: Vec<Gav>,
    /// Content of the impacted log, in reactor order
    pub impacted: Vec<Gav>,
    /// New session module list; `None` keeps the session as is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Gav>>,
    /// New goal list; `None` keeps the goals as is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    /// Per-module property overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<Gav, BTreeMap<String, String>>,
}

impl BuildPlan {
    pub fn new(outcome: PlanOutcome) -> Self {
        Self {
            outcome,
            changed: Vec::new(),
            impacted: Vec::new(),
            modules: None,
            goals: None,
            properties: BTreeMap::new(),
        }
    }

    /// A plan leaving the build untouched
    pub fn untouched(outcome: PlanOutcome, impacted: Vec<Gav>) -> Self {
        Self {
            impacted,
            ..Self::new(outcome)
        }
    }

    pub fn is_untouched(&self) -> bool {
        self.modules.is_none() && self.goals.is_none() && self.properties.is_empty()
    }

    /// Adds `args` to the property overrides of `module`
    pub fn decorate(&mut self, module: &Gav, args: &BTreeMap<String, String>) {
        if args.is_empty() {
            return;
        }
        debug!(module = %module, args = ?args, "Decorating module");
        self.properties
            .entry(module.clone())
            .or_default()
            .extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn properties_of(&self, module: &Gav) -> Option<&BTreeMap<String, String>> {
        self.properties.get(module)
    }

    /// Writes the plan back into the build graph
    pub fn apply(&self, graph: &mut dyn BuildGraph) {
        if let Some(modules) = &self.modules {
            graph.set_session_modules(modules.clone());
        }
        if let Some(goals) = &self.goals {
            graph.set_goals(goals.clone());
        }
        for (module, args) in &self.properties {
            for (key, value) in args {
                graph.set_module_property(module, key, value);
            }
        }
    }
}
