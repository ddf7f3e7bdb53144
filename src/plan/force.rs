//! Force-build rules

use crate::config::ResolverConfig;
use crate::graph::BuildGraph;
use crate::model::Gav;
use std::collections::BTreeSet;

/// Session modules outside `rebuild` that a force-build rule pulls in.
///
/// Patterns match the whole artifactId. A conditional rule applies when its
/// module pattern matches the candidate and its condition matches any module
/// in `impacted`.
pub fn forced_modules(
    config: &ResolverConfig,
    graph: &dyn BuildGraph,
    rebuild: &BTreeSet<Gav>,
    impacted: &BTreeSet<Gav>,
) -> Vec<Gav> {
    if config.force_build_modules.is_empty() && config.force_build_modules_conditionally.is_empty() {
        return Vec::new();
    }

    let active_conditions: Vec<_> = config
        .force_build_modules_conditionally
        .iter()
        .filter(|rule| {
            impacted
                .iter()
                .any(|m| rule.when_impacted.is_match(&m.artifact_id))
        })
        .collect();

    graph
        .session_modules()
        .iter()
        .filter(|candidate| !rebuild.contains(*candidate))
        .filter(|candidate| {
            let artifact_id = candidate.artifact_id.as_str();
            config
                .force_build_modules
                .iter()
                .any(|p| p.is_match(artifact_id))
                || active_conditions
                    .iter()
                    .any(|rule| rule.module.is_match(artifact_id))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;
    use crate::graph::Reactor;
    use crate::model::Module;
    use std::collections::BTreeMap;

    fn gav(a: &str) -> Gav {
        Gav::new("g", a, "1")
    }

    fn graph() -> Reactor {
        Reactor::new(
            ["core", "api", "it-tests", "docs"]
                .iter()
                .map(|a| Module::new(gav(a), format!("/r/{}", a)))
                .collect(),
        )
        .unwrap()
    }

    fn config(key: &str, value: &str) -> ResolverConfig {
        let props = BTreeMap::from([(key.to_string(), value.to_string())]);
        ResolverConfig::from_properties(&props).unwrap()
    }

    #[test]
    fn test_unconditional_pattern_matches_whole_artifact_id() {
        let config = config(keys::FORCE_BUILD_MODULES, "it-.*,doc");
        let rebuild = BTreeSet::from([gav("core")]);

        let forced = forced_modules(&config, &graph(), &rebuild, &rebuild);
        assert_eq!(forced, vec![gav("it-tests")]);
    }

    #[test]
    fn test_already_rebuilt_modules_are_not_forced() {
        let config = config(keys::FORCE_BUILD_MODULES, "core");
        let rebuild = BTreeSet::from([gav("core")]);

        assert!(forced_modules(&config, &graph(), &rebuild, &rebuild).is_empty());
    }

    #[test]
    fn test_conditional_pattern() {
        let config = config(keys::FORCE_BUILD_MODULES_CONDITIONALLY, "it-tests=api");

        let unrelated = BTreeSet::from([gav("core")]);
        assert!(forced_modules(&config, &graph(), &unrelated, &unrelated).is_empty());

        let impacted = BTreeSet::from([gav("api")]);
        assert_eq!(
            forced_modules(&config, &graph(), &impacted, &impacted),
            vec![gav("it-tests")]
        );
    }

    #[test]
    fn test_only_session_modules_are_forced() {
        let config = config(keys::FORCE_BUILD_MODULES, "docs");
        let graph = graph()
            .with_session(vec![gav("core"), gav("api")])
            .unwrap();
        let rebuild = BTreeSet::from([gav("core")]);

        assert!(forced_modules(&config, &graph, &rebuild, &rebuild).is_empty());
    }
}
