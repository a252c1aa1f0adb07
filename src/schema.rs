//! Option schema: typed options declared in a module header
//!
//! An option line is keyed by the argument name and carries exactly one
//! bracketed annotation:
//!
//! ```text
//! fwhm: FWHM of the kernel in mm [float]
//! kind: interpolation kind [list: linear nearest ?]
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::ScriptError;

/// Positional argument name that receives the previous module's output
pub const INPUT_ARG: &str = "input";

/// Value type of one option, parsed once from its annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "choices", rename_all = "snake_case")]
pub enum TypeTag {
    Int,
    Float,
    /// Declared choices in header order; `?` requests free text
    List(Vec<String>),
}

impl TypeTag {
    /// Parse the interior of `[...]`. `None` for anything but int, float
    /// or a non-empty list.
    pub fn parse(annotation: &str) -> Option<Self> {
        let (kind, payload) = match annotation.split_once(':') {
            Some((kind, payload)) => (kind.trim(), Some(payload)),
            None => (annotation.trim(), None),
        };

        match (kind.to_ascii_lowercase().as_str(), payload) {
            ("int", None) => Some(TypeTag::Int),
            ("float", None) => Some(TypeTag::Float),
            ("list", Some(choices)) => {
                let choices: Vec<String> = choices.split_whitespace().map(str::to_string).collect();
                (!choices.is_empty()).then_some(TypeTag::List(choices))
            }
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::List(choices) => write!(f, "list: {}", choices.join(" ")),
        }
    }
}

/// One typed option of a module, in argument declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub tag: TypeTag,
}

/// Raw `(name, annotation)` pairs for the declared arguments.
///
/// An argument without exactly one `name:` line carrying exactly one `[`
/// and one `]` is left out.
pub fn option_annotations(header: &[String], args: Option<&[String]>) -> Vec<(String, String)> {
    let Some(args) = args else {
        return Vec::new();
    };

    let mut annotations = Vec::with_capacity(args.len());
    for arg in args {
        let key = format!("{}:", arg);
        let lines: Vec<&String> = header
            .iter()
            .filter(|line| line.split(' ').next() == Some(key.as_str()))
            .filter(|line| line.matches('[').count() == 1 && line.matches(']').count() == 1)
            .collect();

        match lines.as_slice() {
            [line] => {
                if let Some(annotation) = bracket_interior(line) {
                    annotations.push((arg.clone(), annotation.to_string()));
                }
            }
            other => debug!(arg = %arg, matches = other.len(), "argument has no option line, skipped"),
        }
    }
    annotations
}

fn bracket_interior(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once('[')?;
    let (interior, _) = rest.split_once(']')?;
    Some(interior)
}

/// Build the typed option schema of `module`.
///
/// The `input` argument is supplied by the pipeline, never prompted, so it
/// has no schema entry.
pub fn build_schema(
    module: &str,
    header: &[String],
    args: Option<&[String]>,
) -> Result<Vec<OptionSpec>, ScriptError> {
    option_annotations(header, args)
        .into_iter()
        .filter(|(name, _)| name != INPUT_ARG)
        .map(|(name, annotation)| match TypeTag::parse(&annotation) {
            Some(tag) => Ok(OptionSpec { name, tag }),
            None => Err(ScriptError::MalformedOption {
                module: module.to_string(),
                option: name,
                annotation,
            }),
        })
        .collect()
}
