//! Impacted modules log file

use crate::error::{ResolveError, ResolveResult};
use crate::graph::BuildGraph;
use crate::model::Gav;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One base directory per line, relative to the build root (`.` for the root
/// itself). Modules outside the root keep their absolute path.
pub fn render_impacted(graph: &dyn BuildGraph, impacted: &[Gav]) -> String {
    let root = graph.root_dir();
    impacted
        .iter()
        .filter_map(|id| graph.module(id))
        .map(|module| {
            let relative = module
                .base_dir
                .strip_prefix(root)
                .unwrap_or(module.base_dir.as_path());
            if relative.as_os_str().is_empty() {
                ".".to_string()
            } else {
                relative.display().to_string()
            }
        })
        .map(|line| line + "\n")
        .collect()
}

/// Overwrites `path` with the impacted modules, creating parent directories.
/// A relative `path` is resolved against the build root.
///
/// # Errors
///
/// Returns `ResolveError::ImpactLog` when the file cannot be written.
pub fn write_impacted_log(
    path: &Path,
    graph: &dyn BuildGraph,
    impacted: &[Gav],
) -> ResolveResult<PathBuf> {
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        graph.root_dir().join(path)
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ResolveError::impact_log(&target, e))?;
    }
    fs::write(&target, render_impacted(graph, impacted))
        .map_err(|e| ResolveError::impact_log(&target, e))?;

    info!(path = %target.display(), modules = impacted.len(), "Wrote impacted modules");
    Ok(target)
}
