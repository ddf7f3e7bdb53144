//! Reactor ordering of module lists

use crate::graph::BuildGraph;
use crate::model::Gav;
use std::collections::HashSet;

/// Sorts modules by their position in the full reactor list.
///
/// Modules unknown to the reactor are placed after all known ones, keeping
/// their relative input order. Duplicates are dropped.
pub fn sort_by_reactor_order<I>(graph: &dyn BuildGraph, modules: I) -> Vec<Gav>
where
    I: IntoIterator<Item = Gav>,
{
    let penalty = graph.all_modules().len();

    let mut seen: HashSet<Gav> = HashSet::new();
    let mut keyed: Vec<(usize, Gav)> = Vec::new();
    for module in modules {
        if !seen.insert(module.clone()) {
            continue;
        }
        let key = graph.reactor_index(&module).unwrap_or(penalty);
        keyed.push((key, module));
    }

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, module)| module).collect()
}
