//! Command handlers returning process exit codes

use super::commands::{ImpactedArgs, PlanArgs};
use super::output::{ImpactReport, OutputFormatter};
use crate::changes::{ChangeSet, StaticChangeSource};
use crate::config::{env_properties, ResolverConfig};
use crate::error::ResolveError;
use crate::expr::ModelInterpolator;
use crate::graph::{BuildGraph, Reactor, ReactorSnapshot};
use crate::impact::DownstreamCalculator;
use crate::plan::sort_by_reactor_order;
use crate::resolver::Resolver;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{error, info, warn};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Environment properties overridden by `-D` entries
fn load_config(overrides: &[(String, String)]) -> Result<ResolverConfig, i32> {
    let mut props: BTreeMap<String, String> = env_properties();
    props.extend(overrides.iter().cloned());

    ResolverConfig::from_properties(&props).map_err(|e| {
        error!("{}", e);
        EXIT_CONFIG_ERROR
    })
}

fn read_changes(path: &Path) -> Result<ChangeSet> {
    if path == Path::new("-") {
        return ChangeSet::from_reader(io::stdin().lock()).context("Failed to read changed paths from stdin");
    }
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    ChangeSet::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read changed paths from {:?}", path))
}

pub fn handle_plan(args: &PlanArgs) -> i32 {
    let config = match load_config(&args.properties) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match run_plan(args, config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_plan(args: &PlanArgs, config: ResolverConfig) -> Result<i32> {
    let mut graph = Reactor::load(&args.graph)?;
    let changes = read_changes(&args.changes)?;
    info!(paths = changes.len(), graph = %args.graph.display(), "Planning build");

    let resolver = Resolver::new(config);
    let plan = match resolver.run(&mut graph, &StaticChangeSource::new(changes)) {
        Ok(plan) => plan,
        Err(e) if e.is_skip() => {
            warn!("{}", e);
            return Ok(EXIT_SUCCESS);
        }
        Err(ResolveError::Config(e)) => {
            error!("{}", e);
            return Ok(EXIT_CONFIG_ERROR);
        }
        Err(e) => return Err(e.into()),
    };

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_plan(&plan)?);

    if let Some(output) = &args.output {
        ReactorSnapshot::capture(&graph).write(output)?;
        info!(path = %output.display(), "Wrote updated reactor snapshot");
    }

    Ok(EXIT_SUCCESS)
}

pub fn handle_impacted(args: &ImpactedArgs) -> i32 {
    let config = match load_config(&[]) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match run_impacted(args, &config) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_impacted(args: &ImpactedArgs, config: &ResolverConfig) -> Result<()> {
    let graph = Reactor::load(&args.graph)?;
    let evaluator = ModelInterpolator::new();

    let mut calculator = DownstreamCalculator::new(&graph, &evaluator)
        .with_excluded_packaging(&config.exclude_downstream_modules_packaged_as);
    let impacted = calculator.impacted(&args.module, args.test_only)?;

    let report = ImpactReport {
        module: args.module.clone(),
        test_only: args.test_only,
        impacted: sort_by_reactor_order(&graph, impacted),
    };
    info!(
        module = %report.module,
        impacted = report.impacted.len(),
        modules = graph.all_modules().len(),
        "Computed impact"
    );

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_impact(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_overrides_win_over_defaults() {
        let config = load_config(&[(
            "impactbox.buildDownstream".to_string(),
            "never".to_string(),
        )])
        .unwrap();
        assert!(!config.builds_downstream(crate::graph::MakeBehavior::Both));
    }

    #[test]
    #[serial]
    fn test_invalid_property_is_config_error() {
        let result = load_config(&[(
            "impactbox.buildUpstream".to_string(),
            "sometimes".to_string(),
        )]);
        assert_eq!(result.unwrap_err(), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_read_changes_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "/repo/core/pom.xml").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "app/src/main/App.java").unwrap();

        let changes = read_changes(file.path()).unwrap();
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_read_changes_missing_file() {
        let err = read_changes(Path::new("/nonexistent/changes.txt")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open"));
    }
}
