//! Resolver error types

use crate::config::ConfigError;
use crate::model::Gav;
use std::path::PathBuf;
use thiserror::Error;

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Nothing meaningful to do, e.g. an empty repository. Hosts proceed with
    /// the unmodified build.
    #[error("Skipping incremental build: {0}")]
    Skip(String),

    #[error("Failed to collect changed paths: {0:#}")]
    ChangeSource(anyhow::Error),

    #[error("Failed to write impacted modules to {path}: {source}")]
    ImpactLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Circular dependency detected: {0}")]
    DependencyCycle(String),

    #[error("Module not found in build graph: {0}")]
    UnknownModule(Gav),
}

impl ResolveError {
    pub fn impact_log(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ImpactLog {
            path: path.into(),
            source,
        }
    }

    /// Skip conditions are not failures
    pub fn is_skip(&self) -> bool {
        matches!(self, ResolveError::Skip(_))
    }
}
