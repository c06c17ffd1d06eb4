// * Non-fatal diagnostics collected while building a classification.
// * Recoverable failures are absorbed into feature defaults and reported here.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Normalize,
    Rank,
    Fetch,
    Classify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Rank => "rank",
            Stage::Fetch => "fetch",
            Stage::Classify => "classify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    // * Builds a warning and mirrors it to the log
    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(stage = stage.as_str(), "{}", message);
        Self {
            stage,
            severity: Severity::Warning,
            message,
        }
    }

    // * Builds an error and mirrors it to the log
    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(stage = stage.as_str(), "{}", message);
        Self {
            stage,
            severity: Severity::Error,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", self.stage.as_str(), level, self.message)
    }
}
