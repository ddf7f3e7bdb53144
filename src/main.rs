use impactbox::cli::commands::{CliArgs, Commands};
use impactbox::cli::handlers::{handle_impacted, handle_plan};
use impactbox::util::logging::{self, LoggingConfig, LOG_JSON_ENV, LOG_LEVEL_ENV};
use impactbox::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("impactbox v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Plan(plan_args) => handle_plan(plan_args),
        Commands::Impacted(impacted_args) => handle_impacted(impacted_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        logging::parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        env::var(LOG_LEVEL_ENV)
            .map(|v| logging::parse_level(&v))
            .unwrap_or(Level::INFO)
    };

    let use_json = env::var(LOG_JSON_ENV)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    logging::init_logging(LoggingConfig {
        level,
        use_json,
        ..LoggingConfig::default()
    });
}
