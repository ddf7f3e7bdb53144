//! Host build graph boundary
//!
//! The resolver never owns the build graph. It reads modules and adjacency
//! through [`BuildGraph`] and writes back only the session module list, the
//! goal list and per-module properties.

mod reactor;
mod snapshot;

pub use reactor::Reactor;
pub use snapshot::{ReactorSnapshot, SessionSnapshot};

use crate::model::{Gav, Module};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host "also make" behaviour requested for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MakeBehavior {
    #[default]
    None,
    /// Also build upstream of the selection
    Upstream,
    /// Also build downstream of the selection
    Downstream,
    Both,
}

impl MakeBehavior {
    pub fn includes_upstream(self) -> bool {
        matches!(self, MakeBehavior::Upstream | MakeBehavior::Both)
    }

    pub fn includes_downstream(self) -> bool {
        matches!(self, MakeBehavior::Downstream | MakeBehavior::Both)
    }
}

/// Read/write view of the host's module graph and session
pub trait BuildGraph {
    /// Every module known to the build, in reactor order
    fn all_modules(&self) -> &[Module];

    /// Modules the session currently intends to build, in order
    fn session_modules(&self) -> &[Gav];

    /// Modules explicitly selected by the user; empty when none
    fn selected_modules(&self) -> &[Gav];

    /// Module the build was started from
    fn current_module(&self) -> Option<&Gav>;

    fn root_dir(&self) -> &Path;

    fn is_recursive(&self) -> bool;

    fn make_behavior(&self) -> MakeBehavior;

    fn goals(&self) -> &[String];

    fn module(&self, id: &Gav) -> Option<&Module>;

    /// Modules depending on `id`, directly or transitively
    fn downstream(&self, id: &Gav, transitive: bool) -> Vec<Gav>;

    /// Modules `id` depends on, directly or transitively
    fn upstream(&self, id: &Gav, transitive: bool) -> Vec<Gav>;

    fn set_session_modules(&mut self, modules: Vec<Gav>);

    fn set_goals(&mut self, goals: Vec<String>);

    fn set_module_property(&mut self, id: &Gav, key: &str, value: &str);

    /// Position of `id` in the full reactor list
    fn reactor_index(&self, id: &Gav) -> Option<usize> {
        self.all_modules().iter().position(|m| &m.coordinates == id)
    }

    fn is_in_session(&self, id: &Gav) -> bool {
        self.session_modules().contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_behavior_directions() {
        assert!(!MakeBehavior::None.includes_upstream());
        assert!(!MakeBehavior::None.includes_downstream());
        assert!(MakeBehavior::Upstream.includes_upstream());
        assert!(!MakeBehavior::Upstream.includes_downstream());
        assert!(MakeBehavior::Downstream.includes_downstream());
        assert!(MakeBehavior::Both.includes_upstream());
        assert!(MakeBehavior::Both.includes_downstream());
    }

    #[test]
    fn test_make_behavior_serde() {
        let behavior: MakeBehavior = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(behavior, MakeBehavior::Both);
        assert_eq!(MakeBehavior::default(), MakeBehavior::None);
    }
}
