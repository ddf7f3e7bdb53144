//! One resolution run: changes in, trimmed build graph out

use crate::changes::{ChangeMapper, ChangeSource, ChangeSourceError};
use crate::config::ResolverConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::expr::{ExpressionEvaluator, ModelInterpolator};
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::BuildGraph;
use crate::plan::{write_impacted_log, BuildPlan, PlanAssembler, PlanOutcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves which modules of a build graph need to be built.
///
/// ```no_run
/// use impactbox::changes::{ChangeSet, StaticChangeSource};
/// use impactbox::config::ResolverConfig;
/// use impactbox::graph::Reactor;
/// use impactbox::Resolver;
/// use std::path::Path;
///
/// let mut graph = Reactor::load(Path::new("reactor.yaml")).unwrap();
/// let changes: ChangeSet = vec!["/repo/core/src/main/java/Core.java"].into_iter().collect();
///
/// let resolver = Resolver::new(ResolverConfig::from_env().unwrap());
/// let plan = resolver.run(&mut graph, &StaticChangeSource::new(changes)).unwrap();
/// println!("{:?}", plan.modules);
/// ```
pub struct Resolver {
    config: ResolverConfig,
    file_system: Arc<dyn FileSystem>,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            file_system: Arc::new(RealFileSystem),
            evaluator: Arc::new(ModelInterpolator::new()),
        }
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Computes the build plan without touching the graph or the log file
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Skip` when the change source has nothing to
    /// compare against, `ResolveError::ChangeSource` when it fails, and
    /// `ResolveError::DependencyCycle`/`UnknownModule` for inconsistent graphs.
    pub fn plan(&self, graph: &dyn BuildGraph, source: &dyn ChangeSource) -> ResolveResult<BuildPlan> {
        if self.config.disabled {
            info!("Incremental build resolution is disabled");
            return Ok(BuildPlan::new(PlanOutcome::Disabled));
        }

        let assembler = PlanAssembler::new(&self.config, graph, self.evaluator.as_ref());
        debug!(
            upstream_mode = %assembler.upstream_mode(),
            build_downstream = assembler.builds_downstream(),
            make_behavior = ?graph.make_behavior(),
            "Resolved build directions"
        );

        if let Some(plan) = assembler.short_circuit() {
            return Ok(plan);
        }

        let changes = source
            .changed_paths()
            .map_err(|e| match e {
                ChangeSourceError::Skip(reason) => ResolveError::Skip(reason),
                ChangeSourceError::Failed(err) => ResolveError::ChangeSource(err),
            })?
            .resolve_against(graph.root_dir());
        info!(paths = changes.len(), "Collected changed paths");

        let changed = ChangeMapper::new(graph, self.file_system.as_ref()).map(&changes);
        info!(modules = changed.len(), "Mapped changes to modules");

        assembler.assemble(&changed)
    }

    /// Plans, writes the impacted log (when configured) and commits the plan
    /// to `graph`
    ///
    /// # Errors
    ///
    /// Everything [`plan`](Self::plan) returns, plus `ResolveError::ImpactLog`.
    pub fn run(&self, graph: &mut dyn BuildGraph, source: &dyn ChangeSource) -> ResolveResult<BuildPlan> {
        let plan = self.plan(&*graph, source)?;

        if plan.outcome != PlanOutcome::Disabled {
            if let Some(path) = &self.config.log_impacted_to {
                write_impacted_log(path, &*graph, &plan.impacted)?;
            }
        }

        plan.apply(graph);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::{ChangeSet, StaticChangeSource};
    use crate::fs::MockFileSystem;
    use crate::graph::Reactor;
    use crate::model::{Dependency, Gav, Module};
    use std::path::PathBuf;

    struct SkippingSource;

    impl ChangeSource for SkippingSource {
        fn changed_paths(&self) -> Result<ChangeSet, ChangeSourceError> {
            Err(ChangeSourceError::Skip("repository has no commits".to_string()))
        }
    }

    struct FailingSource;

    impl ChangeSource for FailingSource {
        fn changed_paths(&self) -> Result<ChangeSet, ChangeSourceError> {
            Err(anyhow::anyhow!("git exited with status 128").into())
        }
    }

    fn gav(a: &str) -> Gav {
        Gav::new("g", a, "1")
    }

    fn graph() -> Reactor {
        Reactor::new(vec![
            Module::new(gav("parent"), "/repo")
                .with_packaging("pom")
                .with_submodules(vec!["core".into(), "app".into()]),
            Module::new(gav("core"), "/repo/core"),
            Module::new(gav("app"), "/repo/app").with_dependency(Dependency::new(gav("core"))),
        ])
        .unwrap()
    }

    fn resolver(config: ResolverConfig) -> Resolver {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("pom.xml");
        fs.add_file("core/pom.xml");
        fs.add_file("app/pom.xml");
        Resolver::new(config).with_file_system(Arc::new(fs))
    }

    fn source(paths: &[&str]) -> StaticChangeSource {
        StaticChangeSource::new(paths.iter().copied().collect())
    }

    #[test]
    fn test_run_trims_session() {
        let mut graph = graph();
        let plan = resolver(ResolverConfig::default())
            .run(&mut graph, &source(&["core/src/main/java/Core.java"]))
            .unwrap();

        assert_eq!(plan.outcome, PlanOutcome::Incremental);
        assert_eq!(graph.session_modules(), &[gav("core"), gav("app")]);
    }

    #[test]
    fn test_disabled_leaves_graph_untouched() {
        let mut graph = graph();
        let config = ResolverConfig {
            disabled: true,
            ..ResolverConfig::default()
        };

        // The change source is never consulted
        let plan = resolver(config).run(&mut graph, &SkippingSource).unwrap();
        assert_eq!(plan.outcome, PlanOutcome::Disabled);
        assert_eq!(graph.session_modules().len(), 3);
    }

    #[test]
    fn test_skip_is_propagated() {
        let mut graph = graph();
        let err = resolver(ResolverConfig::default())
            .run(&mut graph, &SkippingSource)
            .unwrap_err();
        assert!(err.is_skip());
        assert_eq!(graph.session_modules().len(), 3);
    }

    #[test]
    fn test_change_source_failure() {
        let mut graph = graph();
        let err = resolver(ResolverConfig::default())
            .run(&mut graph, &FailingSource)
            .unwrap_err();
        assert!(matches!(err, ResolveError::ChangeSource(_)));
        assert!(err.to_string().contains("status 128"));
    }

    #[test]
    fn test_short_circuit_does_not_consult_change_source() {
        let mut graph = graph().with_recursive(false);
        let plan = resolver(ResolverConfig::default())
            .run(&mut graph, &SkippingSource)
            .unwrap();
        assert_eq!(plan.outcome, PlanOutcome::NonRecursive);
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let graph = graph();
        let plan = resolver(ResolverConfig::default())
            .plan(&graph, &source(&[]))
            .unwrap();
        assert_eq!(plan.outcome, PlanOutcome::NoChangesValidate);
        assert_eq!(graph.goals(), &["install".to_string()]);
    }
}
