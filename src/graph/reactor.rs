//! In-memory build graph

use super::{BuildGraph, MakeBehavior};
use crate::error::{ResolveError, ResolveResult};
use crate::model::{Gav, Module};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

const DEFAULT_GOAL: &str = "install";

/// Module graph plus session state, built from a list of modules in reactor order.
///
/// Edges come from declared dependencies (any scope), parent references and
/// build plugins whose coordinates belong to the reactor.
#[derive(Debug, Clone)]
pub struct Reactor {
    modules: Vec<Module>,
    index: HashMap<Gav, usize>,
    upstream: HashMap<Gav, Vec<Gav>>,
    downstream: HashMap<Gav, Vec<Gav>>,
    session: Vec<Gav>,
    in_session: HashSet<Gav>,
    selected: Vec<Gav>,
    current: Option<Gav>,
    root_dir: PathBuf,
    recursive: bool,
    make_behavior: MakeBehavior,
    goals: Vec<String>,
}

impl Reactor {
    /// Creates a reactor whose session contains every module.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::DependencyCycle` when the module graph is cyclic.
    pub fn new(modules: Vec<Module>) -> ResolveResult<Self> {
        let index: HashMap<Gav, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.coordinates.clone(), i))
            .collect();

        let mut upstream: HashMap<Gav, Vec<Gav>> = HashMap::new();
        let mut downstream: HashMap<Gav, Vec<Gav>> = HashMap::new();

        for module in &modules {
            let mut direct: Vec<Gav> = Vec::new();
            let references = module
                .dependencies
                .iter()
                .map(|d| d.coordinates.clone())
                .chain(module.parent.iter().cloned())
                .chain(modules.iter().filter_map(|candidate| {
                    module
                        .plugins
                        .iter()
                        .any(|p| p.refers_to(&candidate.coordinates))
                        .then(|| candidate.coordinates.clone())
                }));

            for target in references {
                if target != module.coordinates
                    && index.contains_key(&target)
                    && !direct.contains(&target)
                {
                    direct.push(target);
                }
            }

            direct.sort_by_key(|g| index[g]);
            for target in &direct {
                downstream
                    .entry(target.clone())
                    .or_default()
                    .push(module.coordinates.clone());
            }
            upstream.insert(module.coordinates.clone(), direct);
        }

        for dependents in downstream.values_mut() {
            dependents.sort_by_key(|g| index[g]);
        }

        let session: Vec<Gav> = modules.iter().map(|m| m.coordinates.clone()).collect();
        let current = session.first().cloned();
        let root_dir = modules
            .first()
            .map(|m| m.base_dir.clone())
            .unwrap_or_default();

        let reactor = Self {
            modules,
            index,
            upstream,
            downstream,
            in_session: session.iter().cloned().collect(),
            session,
            selected: Vec::new(),
            current,
            root_dir,
            recursive: true,
            make_behavior: MakeBehavior::None,
            goals: vec![DEFAULT_GOAL.to_string()],
        };

        reactor.check_acyclic()?;
        Ok(reactor)
    }

    pub fn with_session(mut self, session: Vec<Gav>) -> ResolveResult<Self> {
        self.require_known(&session)?;
        self.set_session_modules(session);
        Ok(self)
    }

    pub fn with_selection(mut self, selected: Vec<Gav>) -> ResolveResult<Self> {
        self.require_known(&selected)?;
        self.selected = selected;
        Ok(self)
    }

    pub fn with_current(mut self, current: Gav) -> ResolveResult<Self> {
        self.require_known(std::slice::from_ref(&current))?;
        self.current = Some(current);
        Ok(self)
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_make_behavior(mut self, make_behavior: MakeBehavior) -> Self {
        self.make_behavior = make_behavior;
        self
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }

    pub fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    fn require_known(&self, ids: &[Gav]) -> ResolveResult<()> {
        match ids.iter().find(|id| !self.index.contains_key(*id)) {
            Some(unknown) => Err(ResolveError::UnknownModule(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Kahn's algorithm over the upstream edges
    fn check_acyclic(&self) -> ResolveResult<()> {
        let mut in_degree: HashMap<&Gav, usize> = self
            .upstream
            .iter()
            .map(|(module, deps)| (module, deps.len()))
            .collect();

        let mut queue: VecDeque<&Gav> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(module, _)| *module)
            .collect();

        let mut visited = 0;
        while let Some(module) = queue.pop_front() {
            visited += 1;
            for dependent in self.downstream.get(module).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if visited < self.modules.len() {
            let mut remaining: Vec<&Gav> = in_degree
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(module, _)| module)
                .collect();
            remaining.sort_by_key(|g| self.index[*g]);
            let cycle = remaining
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::DependencyCycle(cycle));
        }

        Ok(())
    }

    fn walk(&self, edges: &HashMap<Gav, Vec<Gav>>, start: &Gav, transitive: bool) -> Vec<Gav> {
        let direct = edges.get(start).cloned().unwrap_or_default();
        if !transitive {
            return direct;
        }

        let mut seen: HashSet<Gav> = HashSet::new();
        let mut stack = direct;
        while let Some(next) = stack.pop() {
            if seen.insert(next.clone()) {
                stack.extend(edges.get(&next).into_iter().flatten().cloned());
            }
        }

        let mut result: Vec<Gav> = seen.into_iter().collect();
        result.sort_by_key(|g| self.index[g]);
        result
    }
}

impl BuildGraph for Reactor {
    fn all_modules(&self) -> &[Module] {
        &self.modules
    }

    fn session_modules(&self) -> &[Gav] {
        &self.session
    }

    fn selected_modules(&self) -> &[Gav] {
        &self.selected
    }

    fn current_module(&self) -> Option<&Gav> {
        self.current.as_ref()
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn is_recursive(&self) -> bool {
        self.recursive
    }

    fn make_behavior(&self) -> MakeBehavior {
        self.make_behavior
    }

    fn goals(&self) -> &[String] {
        &self.goals
    }

    fn module(&self, id: &Gav) -> Option<&Module> {
        self.index.get(id).map(|&i| &self.modules[i])
    }

    fn downstream(&self, id: &Gav, transitive: bool) -> Vec<Gav> {
        self.walk(&self.downstream, id, transitive)
    }

    fn upstream(&self, id: &Gav, transitive: bool) -> Vec<Gav> {
        self.walk(&self.upstream, id, transitive)
    }

    fn set_session_modules(&mut self, modules: Vec<Gav>) {
        self.in_session = modules.iter().cloned().collect();
        self.session = modules;
    }

    fn set_goals(&mut self, goals: Vec<String>) {
        self.goals = goals;
    }

    fn set_module_property(&mut self, id: &Gav, key: &str, value: &str) {
        if let Some(&i) = self.index.get(id) {
            self.modules[i]
                .properties
                .insert(key.to_string(), value.to_string());
        }
    }

    fn reactor_index(&self, id: &Gav) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn is_in_session(&self, id: &Gav) -> bool {
        self.in_session.contains(id)
    }
}
