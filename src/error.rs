//! Error types with fix suggestions
//!
//! Fatal conditions only. Cancellation and rejected answers are not errors,
//! see [`crate::collector::Resolution`] and [`crate::pipeline::StepOutcome`].

use std::path::PathBuf;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Coarse classification of a [`ScriptError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed module header. Always aborts the build.
    Schema,
    /// Module ordering violated. Always aborts the build.
    Prerequisite,
    /// Rejected interactive answer.
    Input,
    /// Filesystem, platform or configuration problem.
    Environment,
}

#[derive(Error, Debug)]
pub enum ScriptError {
    // ─────────────────────────────────────────────────────────────
    // Header schema errors (SCR-010 to SCR-013)
    // ─────────────────────────────────────────────────────────────
    #[error("SCR-010: module '{module}' does not start with '{marker}'")]
    MissingShebang { module: String, marker: &'static str },

    #[error("SCR-011: module '{module}' has malformed option '{option}': [{annotation}]")]
    MalformedOption {
        module: String,
        option: String,
        annotation: String,
    },

    #[error("SCR-012: more than one output defined for '{module}': {}", .outputs.join(" "))]
    MultipleOutputs { module: String, outputs: Vec<String> },

    #[error("SCR-013: more than one 'input' argument declared for '{module}'")]
    MultipleInputs { module: String },

    // ─────────────────────────────────────────────────────────────
    // Ordering errors (SCR-020 to SCR-021)
    // ─────────────────────────────────────────────────────────────
    #[error("SCR-020: prerequisite '{missing}' of '{module}' not met by earlier modules")]
    UnmetPrerequisite {
        module: String,
        prerequisites: Vec<String>,
        missing: String,
    },

    #[error("SCR-021: '{module}' takes an input but no earlier module declared an output")]
    NoUpstreamOutput { module: String },

    // ─────────────────────────────────────────────────────────────
    // Input errors (SCR-030)
    // ─────────────────────────────────────────────────────────────
    #[error("SCR-030: rejected answers left out: {}", .modules.join(" "))]
    InvalidInput { modules: Vec<String> },

    // ─────────────────────────────────────────────────────────────
    // Environment errors (SCR-040 to SCR-043)
    // ─────────────────────────────────────────────────────────────
    #[error("SCR-040: module '{name}' not found under {}", .dir.display())]
    ModuleNotFound { name: String, dir: PathBuf },

    #[error("SCR-041: no write access to directory {}", .path.display())]
    NotWritable { path: PathBuf },

    #[error("SCR-042: {os} detected, scriptuit requires a Unix-like OS")]
    UnsupportedPlatform { os: &'static str },

    #[error("SCR-043: invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::MissingShebang { .. }
            | ScriptError::MalformedOption { .. }
            | ScriptError::MultipleOutputs { .. }
            | ScriptError::MultipleInputs { .. } => ErrorKind::Schema,
            ScriptError::UnmetPrerequisite { .. } | ScriptError::NoUpstreamOutput { .. } => {
                ErrorKind::Prerequisite
            }
            ScriptError::InvalidInput { .. } => ErrorKind::Input,
            ScriptError::ModuleNotFound { .. }
            | ScriptError::NotWritable { .. }
            | ScriptError::UnsupportedPlatform { .. }
            | ScriptError::Config(_)
            | ScriptError::Io(_)
            | ScriptError::Yaml(_)
            | ScriptError::Json(_) => ErrorKind::Environment,
        }
    }
}

impl FixSuggestion for ScriptError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ScriptError::MissingShebang { .. } => {
                Some("Start the module with '#!/bin/bash' on the first line")
            }
            ScriptError::MalformedOption { .. } => {
                Some("Use [int], [float] or [list: a b c] after the option description")
            }
            ScriptError::MultipleOutputs { .. } => Some("Declare a single name on the 'output:' line"),
            ScriptError::MultipleInputs { .. } => {
                Some("Only one positional argument may be called 'input'")
            }
            ScriptError::UnmetPrerequisite { .. } => {
                Some("Add a matching module earlier in the pipeline")
            }
            ScriptError::NoUpstreamOutput { .. } => {
                Some("Add a module with an 'output:' line before this one")
            }
            ScriptError::InvalidInput { .. } => {
                Some("Rebuild with valid answers: non-negative numbers, a listed option #")
            }
            ScriptError::ModuleNotFound { .. } => {
                Some("Check the module name or pass --modules-dir (see 'scriptuit list')")
            }
            ScriptError::NotWritable { .. } => Some("Choose another output directory"),
            ScriptError::UnsupportedPlatform { .. } => Some("Run scriptuit on Linux or macOS"),
            ScriptError::Config(_) => Some("Check scriptuit.yaml keys and value types"),
            ScriptError::Io(_) => Some("Check file path and permissions"),
            ScriptError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            ScriptError::Json(_) => None,
        }
    }
}
