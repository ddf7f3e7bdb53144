//! Downstream impact calculation

use super::bom;
use super::edge::classify;
use crate::changes::ChangedModules;
use crate::error::{ResolveError, ResolveResult};
use crate::expr::ExpressionEvaluator;
use crate::graph::BuildGraph;
use crate::model::{Gav, Module};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Memoized `impacted(module, test_only)` over one build graph.
///
/// The cache lives as long as the calculator; call [`clear`](Self::clear)
/// between independent runs when reusing an instance.
pub struct DownstreamCalculator<'a> {
    graph: &'a dyn BuildGraph,
    evaluator: &'a dyn ExpressionEvaluator,
    excluded_packaging: &'a [String],
    changed: Option<&'a ChangedModules>,
    cache: HashMap<(Gav, bool), BTreeSet<Gav>>,
    in_progress: Vec<Gav>,
}

impl<'a> DownstreamCalculator<'a> {
    pub fn new(graph: &'a dyn BuildGraph, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        Self {
            graph,
            evaluator,
            excluded_packaging: &[],
            changed: None,
            cache: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Packaging kinds that never become propagation targets
    pub fn with_excluded_packaging(mut self, packaging: &'a [String]) -> Self {
        self.excluded_packaging = packaging;
        self
    }

    /// Directly changed modules; these are exempt from the packaging exclusion
    pub fn with_changed(mut self, changed: &'a ChangedModules) -> Self {
        self.changed = Some(changed);
        self
    }

    /// `module` plus every module affected through it. Always contains `module`.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownModule` for ids missing from the graph and
    /// `ResolveError::DependencyCycle` when the downstream edges loop back.
    pub fn impacted(&mut self, module: &Gav, test_only: bool) -> ResolveResult<BTreeSet<Gav>> {
        let key = (module.clone(), test_only);
        if let Some(cached) = self.cache.get(&key) {
            trace!(module = %module, test_only, "Impact cache hit");
            return Ok(cached.clone());
        }

        if let Some(start) = self.in_progress.iter().position(|g| g == module) {
            let cycle = self.in_progress[start..]
                .iter()
                .chain(std::iter::once(module))
                .map(Gav::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::DependencyCycle(cycle));
        }

        let graph = self.graph;
        let node = graph
            .module(module)
            .ok_or_else(|| ResolveError::UnknownModule(module.clone()))?;

        self.in_progress.push(module.clone());
        let result = self.compute(node, test_only);
        self.in_progress.pop();
        let result = result?;

        self.cache.insert(key, result.clone());
        Ok(result)
    }

    /// Union of the impact of every changed module, each with its own
    /// test-only flag
    pub fn impacted_by(&mut self, changed: &ChangedModules) -> ResolveResult<BTreeSet<Gav>> {
        let mut result = BTreeSet::new();
        for (module, test_only) in changed.iter() {
            result.extend(self.impacted(module, test_only)?);
        }
        Ok(result)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.in_progress.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn compute(&mut self, node: &'a Module, test_only: bool) -> ResolveResult<BTreeSet<Gav>> {
        let graph = self.graph;
        let mut result = BTreeSet::from([node.coordinates.clone()]);

        for candidate_id in graph.downstream(&node.coordinates, false) {
            let Some(candidate) = graph.module(&candidate_id) else {
                continue;
            };
            if self.is_excluded(candidate) {
                debug!(
                    module = %candidate_id,
                    packaging = %candidate.packaging,
                    "Not propagating to excluded packaging"
                );
                continue;
            }

            let edge = classify(node, test_only, candidate);
            trace!(upstream = %node.coordinates, downstream = %candidate_id, %edge, "Classified edge");
            if let Some(next_test_only) = edge.propagated_test_only() {
                result.extend(self.impacted(&candidate_id, next_test_only)?);
            }
        }

        if node.is_pom() {
            for importer_id in bom::importers_of(graph, self.evaluator, node) {
                let Some(importer) = graph.module(&importer_id) else {
                    continue;
                };
                if self.is_excluded(importer) {
                    continue;
                }
                // Already being expanded further up this traversal
                if self.in_progress.contains(&importer_id) {
                    debug!(bom = %node.coordinates, importer = %importer_id, "Skipping BOM importer on the current path");
                    continue;
                }
                let imported = self.impacted(&importer_id, false)?;
                result.extend(imported.into_iter().filter(|g| graph.is_in_session(g)));
            }
        }

        Ok(result)
    }

    fn is_excluded(&self, candidate: &Module) -> bool {
        self.excluded_packaging.iter().any(|p| *p == candidate.packaging)
            && !self
                .changed
                .map_or(false, |changed| changed.contains(&candidate.coordinates))
    }
}
