//! Configuration management for impactbox
//!
//! Settings are read from a flat property map (the host's `-Dkey=value` style
//! properties) or from environment variables, parsed eagerly and validated
//! before any graph work begins. Every error names the offending property.
//!
//! # Properties
//!
//! | Property | Environment variable | Default |
//! |---|---|---|
//! | `impactbox.disable` | `IMPACTBOX_DISABLE` | `false` |
//! | `impactbox.buildUpstream` (`always`/`true`, `derived`, `never`/`false`) | `IMPACTBOX_BUILD_UPSTREAM` | `derived` |
//! | `impactbox.buildUpstreamMode` (`changed`, `impacted`) | `IMPACTBOX_BUILD_UPSTREAM_MODE` | `changed` |
//! | `impactbox.buildDownstream` (`always`/`true`, `derived`, `never`/`false`) | `IMPACTBOX_BUILD_DOWNSTREAM` | `always` |
//! | `impactbox.buildAll` | `IMPACTBOX_BUILD_ALL` | `false` |
//! | `impactbox.buildAllIfNoChanges` | `IMPACTBOX_BUILD_ALL_IF_NO_CHANGES` | `false` |
//! | `impactbox.skipTestsForUpstreamModules` | `IMPACTBOX_SKIP_TESTS_FOR_UPSTREAM_MODULES` | `false` |
//! | `impactbox.argsForUpstreamModules` | `IMPACTBOX_ARGS_FOR_UPSTREAM_MODULES` | empty |
//! | `impactbox.argsForDownstreamModules` | `IMPACTBOX_ARGS_FOR_DOWNSTREAM_MODULES` | empty |
//! | `impactbox.forceBuildModules` | `IMPACTBOX_FORCE_BUILD_MODULES` | empty |
//! | `impactbox.forceBuildModulesConditionally` | `IMPACTBOX_FORCE_BUILD_MODULES_CONDITIONALLY` | empty |
//! | `impactbox.excludeDownstreamModulesPackagedAs` | `IMPACTBOX_EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS` | empty |
//! | `impactbox.disableSelectedProjectsHandling` | `IMPACTBOX_DISABLE_SELECTED_PROJECTS_HANDLING` | `false` |
//! | `impactbox.logImpactedTo` | `IMPACTBOX_LOG_IMPACTED_TO` | unset |
//!
//! Module arguments are `key=value` entries separated by spaces or commas; a
//! bare `key` means `key=true`. Force-build patterns are comma-separated
//! regular expressions matched against the whole artifactId; conditional
//! entries take the form `module-pattern=impacted-pattern`.
//!
//! # Example
//!
//! ```
//! use impactbox::config::ResolverConfig;
//! use std::collections::BTreeMap;
//!
//! let mut props = BTreeMap::new();
//! props.insert("impactbox.buildUpstream".to_string(), "always".to_string());
//! props.insert("impactbox.argsForUpstreamModules".to_string(), "foo=bar".to_string());
//!
//! let config = ResolverConfig::from_properties(&props).unwrap();
//! assert_eq!(config.args_for_upstream_modules.get("foo").map(String::as_str), Some("bar"));
//! ```

use crate::graph::MakeBehavior;
use regex::Regex;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub const PROPERTY_PREFIX: &str = "impactbox.";

pub mod keys {
    pub const DISABLE: &str = "impactbox.disable";
    pub const BUILD_UPSTREAM: &str = "impactbox.buildUpstream";
    pub const BUILD_UPSTREAM_MODE: &str = "impactbox.buildUpstreamMode";
    pub const BUILD_DOWNSTREAM: &str = "impactbox.buildDownstream";
    pub const BUILD_ALL: &str = "impactbox.buildAll";
    pub const BUILD_ALL_IF_NO_CHANGES: &str = "impactbox.buildAllIfNoChanges";
    pub const SKIP_TESTS_FOR_UPSTREAM_MODULES: &str = "impactbox.skipTestsForUpstreamModules";
    pub const ARGS_FOR_UPSTREAM_MODULES: &str = "impactbox.argsForUpstreamModules";
    pub const ARGS_FOR_DOWNSTREAM_MODULES: &str = "impactbox.argsForDownstreamModules";
    pub const FORCE_BUILD_MODULES: &str = "impactbox.forceBuildModules";
    pub const FORCE_BUILD_MODULES_CONDITIONALLY: &str = "impactbox.forceBuildModulesConditionally";
    pub const EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS: &str =
        "impactbox.excludeDownstreamModulesPackagedAs";
    pub const DISABLE_SELECTED_PROJECTS_HANDLING: &str =
        "impactbox.disableSelectedProjectsHandling";
    pub const LOG_IMPACTED_TO: &str = "impactbox.logImpactedTo";
}

/// Property key to environment variable
const ENV_VARS: &[(&str, &str)] = &[
    (keys::DISABLE, "IMPACTBOX_DISABLE"),
    (keys::BUILD_UPSTREAM, "IMPACTBOX_BUILD_UPSTREAM"),
    (keys::BUILD_UPSTREAM_MODE, "IMPACTBOX_BUILD_UPSTREAM_MODE"),
    (keys::BUILD_DOWNSTREAM, "IMPACTBOX_BUILD_DOWNSTREAM"),
    (keys::BUILD_ALL, "IMPACTBOX_BUILD_ALL"),
    (keys::BUILD_ALL_IF_NO_CHANGES, "IMPACTBOX_BUILD_ALL_IF_NO_CHANGES"),
    (
        keys::SKIP_TESTS_FOR_UPSTREAM_MODULES,
        "IMPACTBOX_SKIP_TESTS_FOR_UPSTREAM_MODULES",
    ),
    (
        keys::ARGS_FOR_UPSTREAM_MODULES,
        "IMPACTBOX_ARGS_FOR_UPSTREAM_MODULES",
    ),
    (
        keys::ARGS_FOR_DOWNSTREAM_MODULES,
        "IMPACTBOX_ARGS_FOR_DOWNSTREAM_MODULES",
    ),
    (keys::FORCE_BUILD_MODULES, "IMPACTBOX_FORCE_BUILD_MODULES"),
    (
        keys::FORCE_BUILD_MODULES_CONDITIONALLY,
        "IMPACTBOX_FORCE_BUILD_MODULES_CONDITIONALLY",
    ),
    (
        keys::EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS,
        "IMPACTBOX_EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS",
    ),
    (
        keys::DISABLE_SELECTED_PROJECTS_HANDLING,
        "IMPACTBOX_DISABLE_SELECTED_PROJECTS_HANDLING",
    ),
    (keys::LOG_IMPACTED_TO, "IMPACTBOX_LOG_IMPACTED_TO"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {property}. Valid options: {expected}")]
    InvalidValue {
        property: String,
        value: String,
        expected: String,
    },

    #[error("Invalid pattern '{pattern}' for {property}: {source}")]
    InvalidPattern {
        property: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid entry '{entry}' for {property}")]
    InvalidArgument { property: String, entry: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

impl ConfigError {
    fn invalid_value(property: &str, value: &str, expected: &str) -> Self {
        Self::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Property the error refers to, if any
    pub fn property(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { property, .. }
            | ConfigError::InvalidPattern { property, .. }
            | ConfigError::InvalidArgument { property, .. } => Some(property),
            ConfigError::ValidationFailed(_) => None,
        }
    }
}

/// When to build modules in one direction (upstream or downstream)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDirection {
    Always,
    /// Follow the host's make behaviour (`also-make` / `also-make-dependents`)
    Derived,
    Never,
}

impl BuildDirection {
    fn parse(property: &str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "always" | "true" => Ok(BuildDirection::Always),
            "derived" => Ok(BuildDirection::Derived),
            "never" | "false" => Ok(BuildDirection::Never),
            _ => Err(ConfigError::invalid_value(
                property,
                value,
                "always, true, derived, never, false",
            )),
        }
    }
}

/// Which upstream closure is pulled in when upstream building is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamScope {
    /// Upstream of the changed (or selected) modules
    Changed,
    /// Upstream of every impacted module
    Impacted,
}

impl UpstreamScope {
    fn parse(property: &str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "changed" => Ok(UpstreamScope::Changed),
            "impacted" => Ok(UpstreamScope::Impacted),
            _ => Err(ConfigError::invalid_value(
                property,
                value,
                "changed, impacted",
            )),
        }
    }
}

/// Effective upstream handling for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildUpstreamMode {
    None,
    Changed,
    Impacted,
}

impl fmt::Display for BuildUpstreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildUpstreamMode::None => "none",
            BuildUpstreamMode::Changed => "changed",
            BuildUpstreamMode::Impacted => "impacted",
        };
        f.write_str(name)
    }
}

/// Force-build a module when another module is impacted
#[derive(Debug, Clone)]
pub struct ConditionalForceBuild {
    /// Matched against candidate modules
    pub module: Regex,
    /// Matched against already impacted modules
    pub when_impacted: Regex,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub disabled: bool,
    pub build_upstream: BuildDirection,
    pub build_upstream_mode: UpstreamScope,
    pub build_downstream: BuildDirection,
    pub build_all: bool,
    pub build_all_if_no_changes: bool,
    pub skip_tests_for_upstream_modules: bool,
    pub args_for_upstream_modules: BTreeMap<String, String>,
    pub args_for_downstream_modules: BTreeMap<String, String>,
    pub force_build_modules: Vec<Regex>,
    pub force_build_modules_conditionally: Vec<ConditionalForceBuild>,
    pub exclude_downstream_modules_packaged_as: Vec<String>,
    pub disable_selected_projects_handling: bool,
    pub log_impacted_to: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            build_upstream: BuildDirection::Derived,
            build_upstream_mode: UpstreamScope::Changed,
            build_downstream: BuildDirection::Always,
            build_all: false,
            build_all_if_no_changes: false,
            skip_tests_for_upstream_modules: false,
            args_for_upstream_modules: BTreeMap::new(),
            args_for_downstream_modules: BTreeMap::new(),
            force_build_modules: Vec::new(),
            force_build_modules_conditionally: Vec::new(),
            exclude_downstream_modules_packaged_as: Vec::new(),
            disable_selected_projects_handling: false,
            log_impacted_to: None,
        }
    }
}

impl ResolverConfig {
    /// Parses configuration from a property map, ignoring keys outside the
    /// `impactbox.` namespace.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the property of the first invalid value.
    pub fn from_properties(props: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        for key in props.keys() {
            if key.starts_with(PROPERTY_PREFIX) && !ENV_VARS.iter().any(|(k, _)| *k == key.as_str()) {
                warn!(property = %key, "Ignoring unknown property");
            }
        }

        let get = |key: &str| props.get(key).map(String::as_str);
        let defaults = Self::default();

        let config = Self {
            disabled: parse_bool(keys::DISABLE, get(keys::DISABLE), defaults.disabled)?,
            build_upstream: get(keys::BUILD_UPSTREAM)
                .map(|v| BuildDirection::parse(keys::BUILD_UPSTREAM, v))
                .transpose()?
                .unwrap_or(defaults.build_upstream),
            build_upstream_mode: get(keys::BUILD_UPSTREAM_MODE)
                .map(|v| UpstreamScope::parse(keys::BUILD_UPSTREAM_MODE, v))
                .transpose()?
                .unwrap_or(defaults.build_upstream_mode),
            build_downstream: get(keys::BUILD_DOWNSTREAM)
                .map(|v| BuildDirection::parse(keys::BUILD_DOWNSTREAM, v))
                .transpose()?
                .unwrap_or(defaults.build_downstream),
            build_all: parse_bool(keys::BUILD_ALL, get(keys::BUILD_ALL), defaults.build_all)?,
            build_all_if_no_changes: parse_bool(
                keys::BUILD_ALL_IF_NO_CHANGES,
                get(keys::BUILD_ALL_IF_NO_CHANGES),
                defaults.build_all_if_no_changes,
            )?,
            skip_tests_for_upstream_modules: parse_bool(
                keys::SKIP_TESTS_FOR_UPSTREAM_MODULES,
                get(keys::SKIP_TESTS_FOR_UPSTREAM_MODULES),
                defaults.skip_tests_for_upstream_modules,
            )?,
            args_for_upstream_modules: parse_args(
                keys::ARGS_FOR_UPSTREAM_MODULES,
                get(keys::ARGS_FOR_UPSTREAM_MODULES),
            )?,
            args_for_downstream_modules: parse_args(
                keys::ARGS_FOR_DOWNSTREAM_MODULES,
                get(keys::ARGS_FOR_DOWNSTREAM_MODULES),
            )?,
            force_build_modules: parse_patterns(
                keys::FORCE_BUILD_MODULES,
                get(keys::FORCE_BUILD_MODULES),
            )?,
            force_build_modules_conditionally: parse_conditional_patterns(
                keys::FORCE_BUILD_MODULES_CONDITIONALLY,
                get(keys::FORCE_BUILD_MODULES_CONDITIONALLY),
            )?,
            exclude_downstream_modules_packaged_as: split_list(get(
                keys::EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS,
            )),
            disable_selected_projects_handling: parse_bool(
                keys::DISABLE_SELECTED_PROJECTS_HANDLING,
                get(keys::DISABLE_SELECTED_PROJECTS_HANDLING),
                defaults.disable_selected_projects_handling,
            )?,
            log_impacted_to: get(keys::LOG_IMPACTED_TO)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reads `IMPACTBOX_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_properties(&env_properties())
    }

    /// Checks cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.log_impacted_to {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    keys::LOG_IMPACTED_TO
                )));
            }
        }

        for (key, _) in self
            .args_for_upstream_modules
            .iter()
            .chain(self.args_for_downstream_modules.iter())
        {
            if key.starts_with(PROPERTY_PREFIX) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Module arguments must not set resolver properties: {}",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Upstream handling given the host's make behaviour
    pub fn upstream_mode(&self, make_behavior: MakeBehavior) -> BuildUpstreamMode {
        let active = match self.build_upstream {
            BuildDirection::Always => true,
            BuildDirection::Never => false,
            BuildDirection::Derived => make_behavior.includes_upstream(),
        };

        match (active, self.build_upstream_mode) {
            (false, _) => BuildUpstreamMode::None,
            (true, UpstreamScope::Changed) => BuildUpstreamMode::Changed,
            (true, UpstreamScope::Impacted) => BuildUpstreamMode::Impacted,
        }
    }

    pub fn builds_downstream(&self, make_behavior: MakeBehavior) -> bool {
        match self.build_downstream {
            BuildDirection::Always => true,
            BuildDirection::Never => false,
            BuildDirection::Derived => make_behavior.includes_downstream(),
        }
    }
}

/// `IMPACTBOX_*` environment variables mapped onto their property keys
pub fn env_properties() -> BTreeMap<String, String> {
    ENV_VARS
        .iter()
        .filter_map(|(key, var)| env::var(var).ok().map(|v| (key.to_string(), v)))
        .collect()
}

fn parse_bool(property: &str, value: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        // `-Dflag` without a value
        "" | "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid_value(property, value, "true, false")),
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_args(property: &str, value: Option<&str>) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut args = BTreeMap::new();
    let entries = value
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());

    for entry in entries {
        let (key, value) = match entry.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (entry, "true"),
        };
        if key.is_empty() {
            return Err(ConfigError::InvalidArgument {
                property: property.to_string(),
                entry: entry.to_string(),
            });
        }
        args.insert(key.to_string(), value.to_string());
    }

    Ok(args)
}

fn compile_pattern(property: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::InvalidPattern {
        property: property.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn parse_patterns(property: &str, value: Option<&str>) -> Result<Vec<Regex>, ConfigError> {
    split_list(value)
        .iter()
        .map(|pattern| compile_pattern(property, pattern))
        .collect()
}

fn parse_conditional_patterns(
    property: &str,
    value: Option<&str>,
) -> Result<Vec<ConditionalForceBuild>, ConfigError> {
    split_list(value)
        .iter()
        .map(|entry| -> Result<ConditionalForceBuild, ConfigError> {
            let (module, when_impacted) = entry
                .split_once('=')
                .filter(|(l, r)| !l.trim().is_empty() && !r.trim().is_empty())
                .ok_or_else(|| ConfigError::InvalidArgument {
                    property: property.to_string(),
                    entry: entry.clone(),
                })?;
            Ok(ConditionalForceBuild {
                module: compile_pattern(property, module.trim())?,
                when_impacted: compile_pattern(property, when_impacted.trim())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::from_properties(&BTreeMap::new()).unwrap();
        assert!(!config.disabled);
        assert_eq!(config.build_upstream, BuildDirection::Derived);
        assert_eq!(config.build_upstream_mode, UpstreamScope::Changed);
        assert_eq!(config.build_downstream, BuildDirection::Always);
        assert!(!config.build_all);
        assert!(!config.skip_tests_for_upstream_modules);
        assert!(config.args_for_upstream_modules.is_empty());
        assert!(config.log_impacted_to.is_none());
    }

    #[test]
    fn test_bool_without_value_means_true() {
        let config = ResolverConfig::from_properties(&props(&[(keys::BUILD_ALL, "")])).unwrap();
        assert!(config.build_all);
    }

    #[test]
    fn test_invalid_bool_names_property() {
        let err = ResolverConfig::from_properties(&props(&[(keys::BUILD_ALL, "yes")])).unwrap_err();
        assert_eq!(err.property(), Some(keys::BUILD_ALL));
        assert!(err.to_string().contains(keys::BUILD_ALL));
    }

    #[test]
    fn test_unknown_upstream_literal() {
        let err = ResolverConfig::from_properties(&props(&[(keys::BUILD_UPSTREAM, "sometimes")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { property, value, .. } => {
                assert_eq!(property, keys::BUILD_UPSTREAM);
                assert_eq!(value, "sometimes");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_regex() {
        let err = ResolverConfig::from_properties(&props(&[(keys::FORCE_BUILD_MODULES, "foo(")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert_eq!(err.property(), Some(keys::FORCE_BUILD_MODULES));
    }

    #[test]
    fn test_args_parsing() {
        let config = ResolverConfig::from_properties(&props(&[(
            keys::ARGS_FOR_UPSTREAM_MODULES,
            "foo=bar enforcer.skip,checkstyle.skip=true",
        )]))
        .unwrap();
        let args = &config.args_for_upstream_modules;
        assert_eq!(args.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(args.get("enforcer.skip").map(String::as_str), Some("true"));
        assert_eq!(args.get("checkstyle.skip").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_args_reject_empty_key() {
        let err = ResolverConfig::from_properties(&props(&[(
            keys::ARGS_FOR_DOWNSTREAM_MODULES,
            "=bar",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));
    }

    #[test]
    fn test_force_build_patterns_match_whole_identifier() {
        let config = ResolverConfig::from_properties(&props(&[(
            keys::FORCE_BUILD_MODULES,
            "it-.*, docs",
        )]))
        .unwrap();
        assert_eq!(config.force_build_modules.len(), 2);
        assert!(config.force_build_modules[0].is_match("it-web"));
        assert!(!config.force_build_modules[1].is_match("docs-site"));
    }

    #[test]
    fn test_conditional_patterns() {
        let config = ResolverConfig::from_properties(&props(&[(
            keys::FORCE_BUILD_MODULES_CONDITIONALLY,
            "it-web=web.*,it-core=core",
        )]))
        .unwrap();
        let rules = &config.force_build_modules_conditionally;
        assert_eq!(rules.len(), 2);
        assert!(rules[0].module.is_match("it-web"));
        assert!(rules[0].when_impacted.is_match("web-ui"));

        let err = ResolverConfig::from_properties(&props(&[(
            keys::FORCE_BUILD_MODULES_CONDITIONALLY,
            "it-web",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));
    }

    #[test]
    fn test_upstream_mode_resolution() {
        let mut config = ResolverConfig::default();
        assert_eq!(
            config.upstream_mode(MakeBehavior::None),
            BuildUpstreamMode::None
        );
        assert_eq!(
            config.upstream_mode(MakeBehavior::Upstream),
            BuildUpstreamMode::Changed
        );

        config.build_upstream = BuildDirection::Always;
        config.build_upstream_mode = UpstreamScope::Impacted;
        assert_eq!(
            config.upstream_mode(MakeBehavior::None),
            BuildUpstreamMode::Impacted
        );

        config.build_upstream = BuildDirection::Never;
        assert_eq!(
            config.upstream_mode(MakeBehavior::Both),
            BuildUpstreamMode::None
        );
    }

    #[test]
    fn test_downstream_resolution() {
        let mut config = ResolverConfig::default();
        assert!(config.builds_downstream(MakeBehavior::None));

        config.build_downstream = BuildDirection::Derived;
        assert!(!config.builds_downstream(MakeBehavior::Upstream));
        assert!(config.builds_downstream(MakeBehavior::Downstream));
    }

    #[test]
    fn test_excluded_packaging() {
        let config = ResolverConfig::from_properties(&props(&[(
            keys::EXCLUDE_DOWNSTREAM_MODULES_PACKAGED_AS,
            "war, ear",
        )]))
        .unwrap();
        assert_eq!(
            config.exclude_downstream_modules_packaged_as,
            vec!["war".to_string(), "ear".to_string()]
        );
    }

    #[test]
    fn test_args_cannot_set_resolver_properties() {
        let err = ResolverConfig::from_properties(&props(&[(
            keys::ARGS_FOR_UPSTREAM_MODULES,
            "impactbox.buildAll=true",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }
}
