//! Output formatting for build plans and impact reports
//!
//! JSON and YAML serialize the underlying types directly; the human format
//! is a short tree-style summary.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::Gav;
use crate::plan::BuildPlan;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Downstream impact of a single module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub module: Gav,
    pub test_only: bool,
    /// In reactor order, including `module` itself
    pub impacted: Vec<Gav>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_plan(&self, plan: &BuildPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(plan, "build plan"),
            OutputFormat::Yaml => to_yaml(plan, "build plan"),
            OutputFormat::Human => Ok(self.format_plan_human(plan)),
        }
    }

    pub fn format_impact(&self, report: &ImpactReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report, "impact report"),
            OutputFormat::Yaml => to_yaml(report, "impact report"),
            OutputFormat::Human => Ok(self.format_impact_human(report)),
        }
    }

    fn format_plan_human(&self, plan: &BuildPlan) -> String {
        let mut output = String::new();

        output.push_str(&format!("\u{2713} Build Plan ({})\n", plan.outcome));
        output.push_str(RULE);
        output.push_str("\n\n");

        push_list(&mut output, "Changed", &plan.changed);
        push_list(&mut output, "Impacted", &plan.impacted);

        match &plan.modules {
            Some(modules) => push_list(&mut output, "Modules to build", modules),
            None => output.push_str("Modules to build: (session unchanged)\n\n"),
        }

        if let Some(goals) = &plan.goals {
            output.push_str(&format!("Goals: {}\n\n", goals.join(" ")));
        }

        if !plan.properties.is_empty() {
            output.push_str("Module properties:\n");
            let last = plan.properties.len() - 1;
            for (i, (module, args)) in plan.properties.iter().enumerate() {
                let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
                let rendered = args
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ");
                output.push_str(&format!("{}\u{2500} {}  {}\n", connector, module, rendered));
            }
        }

        output
    }

    fn format_impact_human(&self, report: &ImpactReport) -> String {
        let mut output = String::new();
        let kind = if report.test_only { " (test-only)" } else { "" };
        output.push_str(&format!("Impact of {}{}\n", report.module, kind));
        output.push_str(RULE);
        output.push_str("\n\n");
        push_list(&mut output, "Impacted", &report.impacted);
        output
    }
}

fn push_list(output: &mut String, title: &str, modules: &[Gav]) {
    if modules.is_empty() {
        output.push_str(&format!("{}: (none)\n\n", title));
        return;
    }

    output.push_str(&format!("{} ({}):\n", title, modules.len()));
    for (i, module) in modules.iter().enumerate() {
        let connector = if i == modules.len() - 1 {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        output.push_str(&format!("{}\u{2500} {}\n", connector, module));
    }
    output.push('\n');
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}
