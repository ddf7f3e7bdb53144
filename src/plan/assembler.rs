//! Turns changed modules into a build plan

use super::args::{downstream_args, upstream_args};
use super::force::forced_modules;
use super::order::sort_by_reactor_order;
use super::{BuildPlan, PlanOutcome, VALIDATE_GOAL};
use crate::changes::ChangedModules;
use crate::config::{BuildUpstreamMode, ResolverConfig};
use crate::error::ResolveResult;
use crate::expr::ExpressionEvaluator;
use crate::graph::BuildGraph;
use crate::impact::DownstreamCalculator;
use crate::model::Gav;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub struct PlanAssembler<'a> {
    config: &'a ResolverConfig,
    graph: &'a dyn BuildGraph,
    evaluator: &'a dyn ExpressionEvaluator,
    upstream_mode: BuildUpstreamMode,
    build_downstream: bool,
}

impl<'a> PlanAssembler<'a> {
    pub fn new(
        config: &'a ResolverConfig,
        graph: &'a dyn BuildGraph,
        evaluator: &'a dyn ExpressionEvaluator,
    ) -> Self {
        let make_behavior = graph.make_behavior();
        Self {
            config,
            graph,
            evaluator,
            upstream_mode: config.upstream_mode(make_behavior),
            build_downstream: config.builds_downstream(make_behavior),
        }
    }

    pub fn upstream_mode(&self) -> BuildUpstreamMode {
        self.upstream_mode
    }

    pub fn builds_downstream(&self) -> bool {
        self.build_downstream
    }

    /// Explicitly selected modules, empty when selection handling is disabled
    fn selection(&self) -> &'a [Gav] {
        if self.config.disable_selected_projects_handling {
            &[]
        } else {
            self.graph.selected_modules()
        }
    }

    /// Plans that need no change information: the session already matches
    /// the selection, or there is nothing to trim.
    pub fn short_circuit(&self) -> Option<BuildPlan> {
        let selection = self.selection();
        let session = self.graph.session_modules();
        let logged = || sort_by_reactor_order(self.graph, selection.iter().cloned());

        if !selection.is_empty()
            && session.len() == selection.len()
            && session.iter().all(|m| selection.contains(m))
        {
            info!(modules = selection.len(), "Session contains only the selected modules, nothing to trim");
            return Some(BuildPlan::untouched(PlanOutcome::SelectionUnchanged, logged()));
        }

        let single_leaf = session.len() == 1
            && self
                .graph
                .module(&session[0])
                .map_or(true, |m| m.submodules.is_empty());
        if !self.graph.is_recursive() || single_leaf {
            info!("Non-recursive build, nothing to trim");
            return Some(BuildPlan::untouched(PlanOutcome::NonRecursive, logged()));
        }

        None
    }

    /// Runs the full decision sequence for the given changed modules
    pub fn assemble(&self, changed: &ChangedModules) -> ResolveResult<BuildPlan> {
        if changed.is_empty() {
            return self.no_changes();
        }

        let graph = self.graph;
        let selection = self.selection();
        let mut calculator = self.calculator().with_changed(changed);

        let roots: Vec<(Gav, bool)> = if selection.is_empty() {
            changed.iter().map(|(m, t)| (m.clone(), t)).collect()
        } else {
            selection
                .iter()
                .map(|m| (m.clone(), changed.is_test_only(m)))
                .collect()
        };

        let mut impacted: BTreeSet<Gav> = roots.iter().map(|(m, _)| m.clone()).collect();
        if self.config.build_all || self.build_downstream {
            for (module, test_only) in &roots {
                impacted.extend(calculator.impacted(module, *test_only)?);
            }
        }
        impacted.retain(|m| graph.is_in_session(m));
        calculator.clear();

        info!(
            changed = changed.len(),
            impacted = impacted.len(),
            upstream_mode = %self.upstream_mode,
            "Computed impacted modules"
        );

        let upstream_roots: Vec<&Gav> = match self.upstream_mode {
            BuildUpstreamMode::None => Vec::new(),
            BuildUpstreamMode::Changed => roots.iter().map(|(m, _)| m).collect(),
            BuildUpstreamMode::Impacted => impacted.iter().collect(),
        };
        let upstream_only: BTreeSet<Gav> = upstream_roots
            .into_iter()
            .flat_map(|m| graph.upstream(m, true))
            .filter(|m| graph.is_in_session(m) && !impacted.contains(m))
            .collect();

        let mut rebuild: BTreeSet<Gav> = impacted.iter().cloned().collect();
        rebuild.extend(upstream_only.iter().cloned());

        let outcome = if self.config.build_all {
            PlanOutcome::BuildAll
        } else {
            PlanOutcome::Incremental
        };
        let mut plan = BuildPlan::new(outcome);
        plan.changed = sort_by_reactor_order(graph, changed.ids().cloned());
        plan.impacted = sort_by_reactor_order(graph, impacted.iter().cloned());

        let directly_requested: BTreeSet<&Gav> = changed.ids().chain(selection.iter()).collect();
        let downstream = downstream_args(self.config);
        for module in impacted.iter().filter(|m| !directly_requested.contains(m)) {
            plan.decorate(module, &downstream);
        }

        if self.config.build_all {
            for module in graph.session_modules().iter().filter(|m| !impacted.contains(*m)) {
                self.decorate_upstream(&mut plan, module);
            }
            info!(modules = graph.session_modules().len(), "Building all modules");
            return Ok(plan);
        }

        if rebuild.is_empty() {
            info!("No changed module is part of the session");
            return self.no_changes();
        }

        for module in &upstream_only {
            self.decorate_upstream(&mut plan, module);
        }

        for module in forced_modules(self.config, graph, &rebuild, &impacted) {
            debug!(module = %module, "Force-building module");
            self.decorate_upstream(&mut plan, &module);
            rebuild.insert(module);
        }

        let modules = sort_by_reactor_order(graph, rebuild);
        info!(
            modules = modules.len(),
            session = graph.session_modules().len(),
            "Trimmed session to impacted modules"
        );
        plan.modules = Some(modules);
        Ok(plan)
    }

    fn no_changes(&self) -> ResolveResult<BuildPlan> {
        let graph = self.graph;
        let selection = self.selection();
        let session = graph.session_modules();

        if !selection.is_empty() {
            let mut calculator = self.calculator();
            let mut downstream: BTreeSet<Gav> = BTreeSet::new();
            for module in selection {
                downstream.extend(calculator.impacted(module, false)?);
            }
            downstream.retain(|m| graph.is_in_session(m) && !selection.contains(m));

            let base: BTreeSet<&Gav> = selection.iter().chain(downstream.iter()).collect();
            let mut plan = BuildPlan::new(PlanOutcome::NoChangesSelected);

            let mut modules: Vec<Gav> = if self.upstream_mode == BuildUpstreamMode::None {
                session.iter().filter(|m| base.contains(m)).cloned().collect()
            } else {
                for module in session.iter().filter(|m| !base.contains(m)) {
                    self.decorate_upstream(&mut plan, module);
                }
                session.to_vec()
            };

            if self.build_downstream {
                plan.impacted = sort_by_reactor_order(graph, base.into_iter().cloned());
            } else {
                modules.retain(|m| !downstream.contains(m));
                plan.properties.retain(|m, _| !downstream.contains(m));
                plan.impacted = sort_by_reactor_order(graph, selection.iter().cloned());
            }

            info!(
                selected = selection.len(),
                modules = modules.len(),
                "No changes, building selected modules"
            );
            plan.modules = Some(sort_by_reactor_order(graph, modules));
            return Ok(plan);
        }

        if self.config.build_all_if_no_changes {
            let mut plan = BuildPlan::new(PlanOutcome::NoChangesBuildAll);
            for module in session {
                self.decorate_upstream(&mut plan, module);
            }
            info!(modules = session.len(), "No changes, building all modules");
            return Ok(plan);
        }

        let mut plan = BuildPlan::new(PlanOutcome::NoChangesValidate);
        let current = graph.current_module().or_else(|| session.first());
        if let Some(current) = current {
            self.decorate_upstream(&mut plan, current);
        }
        plan.modules = Some(current.into_iter().cloned().collect());
        plan.goals = Some(vec![VALIDATE_GOAL.to_string()]);
        info!(
            module = %current.map(Gav::to_string).unwrap_or_default(),
            "No changes, validating current module only"
        );
        Ok(plan)
    }

    fn calculator(&self) -> DownstreamCalculator<'a> {
        DownstreamCalculator::new(self.graph, self.evaluator)
            .with_excluded_packaging(&self.config.exclude_downstream_modules_packaged_as)
    }

    fn decorate_upstream(&self, plan: &mut BuildPlan, module: &Gav) {
        if let Some(node) = self.graph.module(module) {
            plan.decorate(module, &upstream_args(self.config, node));
        }
    }
}
