//! `${...}` expression evaluation against a module's property context
//!
//! Only used to match bill-of-materials imports, whose coordinates live in
//! the original (uninterpolated) dependency management of the importer.

use crate::model::Module;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("Unresolved expression '${{{0}}}'")]
    Unresolved(String),

    #[error("Expression '{0}' exceeds the interpolation depth limit")]
    RecursionLimit(String),
}

/// Narrow evaluation seam: expand every `${...}` in `expression` using `context`
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str, context: &Module) -> Result<String, ExpressionError>;
}

/// Interpolates model coordinates (`project.*`, `pom.*`, `project.parent.*`)
/// and the module's effective properties, recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelInterpolator;

impl ModelInterpolator {
    pub fn new() -> Self {
        Self
    }

    fn lookup(&self, name: &str, context: &Module) -> Option<String> {
        let model_key = name
            .strip_prefix("project.")
            .or_else(|| name.strip_prefix("pom."));

        if let Some(key) = model_key {
            let parent = context.parent.as_ref();
            let value = match key {
                "groupId" => Some(context.coordinates.group_id.clone()),
                "artifactId" => Some(context.coordinates.artifact_id.clone()),
                "version" => Some(context.coordinates.version.clone()),
                "packaging" => Some(context.packaging.clone()),
                "basedir" => Some(context.base_dir.display().to_string()),
                "parent.groupId" => parent.map(|p| p.group_id.clone()),
                "parent.artifactId" => parent.map(|p| p.artifact_id.clone()),
                "parent.version" => parent.map(|p| p.version.clone()),
                _ => None,
            };
            if value.is_some() {
                return value;
            }
        }

        match name {
            "basedir" => Some(context.base_dir.display().to_string()),
            _ => context.properties.get(name).cloned(),
        }
    }

    fn expand(&self, expression: &str, context: &Module, depth: usize) -> Result<String, ExpressionError> {
        if depth > MAX_DEPTH {
            return Err(ExpressionError::RecursionLimit(expression.to_string()));
        }

        let pattern = placeholder_pattern();
        if !pattern.is_match(expression) {
            return Ok(expression.to_string());
        }

        let mut result = String::with_capacity(expression.len());
        let mut last = 0;
        for captures in pattern.captures_iter(expression) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            result.push_str(&expression[last..whole.start()]);
            let value = self
                .lookup(name.as_str().trim(), context)
                .ok_or_else(|| ExpressionError::Unresolved(name.as_str().to_string()))?;
            result.push_str(&self.expand(&value, context, depth + 1)?);
            last = whole.end();
        }
        result.push_str(&expression[last..]);
        Ok(result)
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl ExpressionEvaluator for ModelInterpolator {
    fn evaluate(&self, expression: &str, context: &Module) -> Result<String, ExpressionError> {
        self.expand(expression, context, 0)
    }
}
