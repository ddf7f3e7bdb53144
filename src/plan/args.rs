//! Property overrides for modules built for someone else's sake

use crate::config::ResolverConfig;
use crate::model::Module;
use std::collections::BTreeMap;

/// Skips test execution but still compiles tests (needed to package a test-jar)
pub const SKIP_TESTS: &str = "skipTests";
/// Skips test compilation and execution
pub const SKIP_TEST_COMPILATION: &str = "maven.test.skip";

/// Arguments for modules that are only built because a rebuilt module needs
/// them. Configured arguments win over the skip-tests flag.
pub fn upstream_args(config: &ResolverConfig, module: &Module) -> BTreeMap<String, String> {
    let mut args = BTreeMap::new();
    if config.skip_tests_for_upstream_modules {
        let key = if module.declares_test_jar_goal() {
            SKIP_TESTS
        } else {
            SKIP_TEST_COMPILATION
        };
        args.insert(key.to_string(), "true".to_string());
    }
    args.extend(
        config
            .args_for_upstream_modules
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    args
}

/// Arguments for modules rebuilt only because something upstream changed
pub fn downstream_args(config: &ResolverConfig) -> BTreeMap<String, String> {
    config.args_for_downstream_modules.clone()
}
