//! Serializable reactor snapshots (JSON or YAML)

use super::{BuildGraph, MakeBehavior, Reactor};
use crate::model::{Gav, Module};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session state of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Active modules; all modules when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Gav>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected: Vec<Gav>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Gav>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(default)]
    pub make_behavior: MakeBehavior,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactorSnapshot {
    pub modules: Vec<Module>,
    #[serde(default)]
    pub session: SessionSnapshot,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl ReactorSnapshot {
    pub fn parse(content: &str, yaml: bool) -> Result<Self> {
        if yaml {
            serde_yaml::from_str(content).context("Failed to parse YAML reactor snapshot")
        } else {
            serde_json::from_str(content).context("Failed to parse JSON reactor snapshot")
        }
    }

    /// Reads a snapshot, choosing the format by file extension
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reactor snapshot {:?}", path))?;
        Self::parse(&content, is_yaml(path))
            .with_context(|| format!("Invalid reactor snapshot {:?}", path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self).context("Failed to serialize snapshot as YAML")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize snapshot as JSON")?
        };
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
    }

    pub fn into_reactor(self) -> Result<Reactor> {
        let session = self.session;
        let mut reactor = Reactor::new(self.modules)?;

        if let Some(projects) = session.projects {
            reactor = reactor.with_session(projects)?;
        }
        reactor = reactor.with_selection(session.selected)?;
        if let Some(current) = session.current {
            reactor = reactor.with_current(current)?;
        }
        if let Some(root_dir) = session.root_dir {
            reactor = reactor.with_root_dir(root_dir);
        }
        if let Some(recursive) = session.recursive {
            reactor = reactor.with_recursive(recursive);
        }
        if !session.goals.is_empty() {
            reactor = reactor.with_goals(session.goals);
        }
        Ok(reactor.with_make_behavior(session.make_behavior))
    }

    /// Captures the current state of a graph, including written-back properties
    pub fn capture(graph: &dyn BuildGraph) -> Self {
        Self {
            modules: graph.all_modules().to_vec(),
            session: SessionSnapshot {
                projects: Some(graph.session_modules().to_vec()),
                selected: graph.selected_modules().to_vec(),
                current: graph.current_module().cloned(),
                root_dir: Some(graph.root_dir().to_path_buf()),
                recursive: Some(graph.is_recursive()),
                make_behavior: graph.make_behavior(),
                goals: graph.goals().to_vec(),
            },
        }
    }
}

impl Reactor {
    /// Loads a reactor from a JSON or YAML snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        ReactorSnapshot::read(path)?.into_reactor()
    }
}
