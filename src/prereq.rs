//! Prerequisite validation
//!
//! A prerequisite is a case-insensitive prefix pattern over earlier module
//! names. `*` matches any run of characters; every other character is
//! literal.

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::error::ScriptError;

const WILDCARD: char = '*';

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compile a prerequisite into a start-anchored prefix pattern
fn compile(prerequisite: &str) -> Option<Pattern> {
    let literal: Vec<String> = prerequisite
        .to_lowercase()
        .split(WILDCARD)
        .map(Pattern::escape)
        .collect();
    let mut source = format!("{}*", literal.join("*"));
    // glob reads "**" as a recursive wildcard
    while source.contains("**") {
        source = source.replace("**", "*");
    }
    Pattern::new(&source).ok()
}

/// Whether some already used module satisfies `prerequisite`
pub fn is_satisfied(prerequisite: &str, used_modules: &[String]) -> bool {
    let Some(pattern) = compile(prerequisite) else {
        return false;
    };
    used_modules
        .iter()
        .any(|used| pattern.matches_with(&used.to_lowercase(), MATCH_OPTIONS))
}

/// Check each prerequisite of `module` in order, failing on the first
/// one that no earlier module matches.
pub fn validate_prerequisites(
    module: &str,
    prerequisites: Option<&[String]>,
    used_modules: &[String],
) -> Result<(), ScriptError> {
    let Some(prerequisites) = prerequisites else {
        return Ok(());
    };

    for prerequisite in prerequisites {
        if !is_satisfied(prerequisite, used_modules) {
            return Err(ScriptError::UnmetPrerequisite {
                module: module.to_string(),
                prerequisites: prerequisites.to_vec(),
                missing: prerequisite.clone(),
            });
        }
        debug!(module, prerequisite = %prerequisite, "prerequisite met");
    }
    Ok(())
}
