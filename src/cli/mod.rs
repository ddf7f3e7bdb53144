pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ImpactedArgs, PlanArgs};
pub use output::{ImpactReport, OutputFormat, OutputFormatter};
