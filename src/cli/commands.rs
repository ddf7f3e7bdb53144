use crate::model::Gav;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Incremental build resolution for multi-module builds
#[derive(Parser, Debug)]
#[command(
    name = "impactbox",
    about = "Incremental build resolution for multi-module builds",
    version,
    author,
    long_about = "impactbox maps changed files onto the modules of a multi-module build, \
                  computes everything affected downstream (including test-jar and BOM \
                  relationships) and trims the build to the modules that need a rebuild."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Compute the build plan for a set of changed files",
        long_about = "Loads a reactor snapshot, maps the changed files onto its modules and \
                      prints the resulting build plan. Resolver settings are read from \
                      IMPACTBOX_* environment variables and may be overridden with -D.\n\n\
                      Examples:\n  \
                      git diff --name-only origin/main | impactbox plan --graph reactor.yaml\n  \
                      impactbox plan --graph reactor.json --changes changed.txt --format json\n  \
                      impactbox plan --graph reactor.yaml -D impactbox.buildUpstream=always \\\n    \
                      -D impactbox.argsForUpstreamModules=skipTests"
    )]
    Plan(PlanArgs),

    #[command(
        about = "Show the downstream impact of one module",
        long_about = "Prints every module affected by a change to the given module.\n\n\
                      Examples:\n  \
                      impactbox impacted --graph reactor.yaml --module com.acme:core:1.0\n  \
                      impactbox impacted --graph reactor.yaml --module com.acme:core:1.0 --test-only"
    )]
    Impacted(ImpactedArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[arg(
        short = 'g',
        long,
        value_name = "FILE",
        help = "Reactor snapshot (JSON, or YAML by .yaml/.yml extension)"
    )]
    pub graph: PathBuf,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        default_value = "-",
        help = "File listing changed paths, one per line ('-' reads stdin)"
    )]
    pub changes: PathBuf,

    #[arg(
        short = 'D',
        value_name = "KEY=VALUE",
        value_parser = parse_property,
        help = "Set a resolver property (repeatable)"
    )]
    pub properties: Vec<(String, String)>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the updated reactor snapshot to this file"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ImpactedArgs {
    #[arg(short = 'g', long, value_name = "FILE", help = "Reactor snapshot")]
    pub graph: PathBuf,

    #[arg(
        short = 'm',
        long,
        value_name = "GROUP:ARTIFACT:VERSION",
        help = "Module whose impact to compute"
    )]
    pub module: Gav,

    #[arg(long, help = "Treat the change as confined to test sources")]
    pub test_only: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

/// `key=value`; a bare `key` means `key=` (an enabled flag)
fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s.split_once('=').unwrap_or((s, ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid property '{}': expected KEY=VALUE", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_plan_args() {
        let args = CliArgs::parse_from(["impactbox", "plan", "--graph", "reactor.yaml"]);
        match args.command {
            Commands::Plan(plan_args) => {
                assert_eq!(plan_args.graph, PathBuf::from("reactor.yaml"));
                assert_eq!(plan_args.changes, PathBuf::from("-"));
                assert_eq!(plan_args.format, OutputFormatArg::Human);
                assert!(plan_args.properties.is_empty());
                assert!(plan_args.output.is_none());
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_plan_with_properties() {
        let args = CliArgs::parse_from([
            "impactbox",
            "plan",
            "--graph",
            "reactor.json",
            "--changes",
            "changed.txt",
            "-D",
            "impactbox.buildUpstream=always",
            "-Dimpactbox.buildAll",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::Plan(plan_args) => {
                assert_eq!(
                    plan_args.properties,
                    vec![
                        ("impactbox.buildUpstream".to_string(), "always".to_string()),
                        ("impactbox.buildAll".to_string(), String::new()),
                    ]
                );
                assert_eq!(plan_args.format, OutputFormatArg::Json);
                assert_eq!(plan_args.changes, PathBuf::from("changed.txt"));
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_impacted_command() {
        let args = CliArgs::parse_from([
            "impactbox",
            "impacted",
            "--graph",
            "reactor.yaml",
            "--module",
            "com.acme:core:1.0",
            "--test-only",
        ]);
        match args.command {
            Commands::Impacted(impacted_args) => {
                assert_eq!(impacted_args.module, Gav::new("com.acme", "core", "1.0"));
                assert!(impacted_args.test_only);
            }
            _ => panic!("Expected Impacted command"),
        }
    }

    #[test]
    fn test_invalid_module_coordinates() {
        let result = CliArgs::try_parse_from([
            "impactbox",
            "impacted",
            "--graph",
            "reactor.yaml",
            "--module",
            "core",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["impactbox", "-v", "plan", "--graph", "r.yaml"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["impactbox", "--log-level", "debug", "plan", "-g", "r.yaml"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert_eq!(parse_property("flag"), Ok(("flag".to_string(), String::new())));
        assert!(parse_property("=value").is_err());
    }
}
