//! Bill-of-materials import edges
//!
//! An importer's dependency management is matched in its original form, so
//! versions such as `${project.version}` are expanded against the importer
//! before comparing with the BOM's coordinates.

use crate::expr::ExpressionEvaluator;
use crate::graph::BuildGraph;
use crate::model::{Gav, ManagedDependency, Module};
use tracing::{debug, warn};

/// Modules anywhere in the graph (not only the session) importing `bom`
pub fn importers_of(
    graph: &dyn BuildGraph,
    evaluator: &dyn ExpressionEvaluator,
    bom: &Module,
) -> Vec<Gav> {
    graph
        .all_modules()
        .iter()
        .filter(|candidate| candidate.coordinates != bom.coordinates)
        .filter(|candidate| {
            candidate
                .original_dependency_management
                .iter()
                .filter(|entry| entry.is_bom_import())
                .any(|entry| imports(evaluator, candidate, entry, &bom.coordinates))
        })
        .map(|importer| {
            debug!(bom = %bom.coordinates, importer = %importer.coordinates, "Found BOM importer");
            importer.coordinates.clone()
        })
        .collect()
}

/// Whether `entry`, evaluated in the context of `importer`, names `bom`.
/// Unresolvable expressions count as a non-match.
fn imports(
    evaluator: &dyn ExpressionEvaluator,
    importer: &Module,
    entry: &ManagedDependency,
    bom: &Gav,
) -> bool {
    let resolved = [&entry.group_id, &entry.artifact_id, &entry.version]
        .into_iter()
        .map(|value| evaluator.evaluate(value, importer))
        .collect::<Result<Vec<String>, _>>();

    match resolved.as_deref() {
        Ok([group_id, artifact_id, version]) => bom.matches(group_id, artifact_id, version),
        Ok(_) => false,
        Err(e) => {
            warn!(
                importer = %importer.coordinates,
                entry = %format!("{}:{}:{}", entry.group_id, entry.artifact_id, entry.version),
                error = %e,
                "Ignoring BOM import with unresolvable coordinates"
            );
            false
        }
    }
}
