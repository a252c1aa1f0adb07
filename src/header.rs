//! Module header extraction
//!
//! A module is a bash script whose leading comment block describes it:
//!
//! ```text
//! #!/bin/bash
//! #
//! # prereq: init_*
//! # output: func
//! # dm_mask input smoothing kind
//! #
//! # smoothing: FWHM of the kernel in mm [float]
//! # kind: interpolation kind [list: linear nearest ?]
//! #
//! echo $1 ${2}
//! ```
//!
//! The header is the run of `#` lines right after the shebang. The body is
//! everything from the first non-comment line on.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ScriptError;

/// Required first line of every module
pub const SHEBANG: &str = "#!/bin/bash";

const COMMENT: char = '#';

/// Header and body of one module file, split once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSource {
    /// Header lines, comment marker and surrounding whitespace stripped
    pub header: Vec<String>,
    /// Lines from the first non-header line onward
    pub body: Vec<String>,
}

impl ModuleSource {
    /// Split module text into header and body.
    ///
    /// `module` only names the module in errors.
    pub fn parse(module: &str, contents: &str) -> Result<Self, ScriptError> {
        let mut lines = contents.lines();

        match lines.next() {
            Some(first) if first.starts_with(SHEBANG) => {}
            _ => {
                return Err(ScriptError::MissingShebang {
                    module: module.to_string(),
                    marker: SHEBANG,
                })
            }
        }

        let mut header = Vec::new();
        let mut body = Vec::new();
        for line in lines.by_ref() {
            if line.starts_with(COMMENT) {
                header.push(line.trim_start_matches(COMMENT).trim().to_string());
            } else {
                body.push(line.to_string());
                break;
            }
        }
        body.extend(lines.map(str::to_string));

        debug!(module, header = header.len(), body = body.len(), "split module source");
        Ok(Self { header, body })
    }

    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&module_name(path), &contents)
    }
}

/// Header lines of the module at `path`
pub fn read_header(path: &Path) -> Result<Vec<String>, ScriptError> {
    Ok(ModuleSource::read(path)?.header)
}

/// Body lines of the module at `path`
pub fn read_body(path: &Path) -> Result<Vec<String>, ScriptError> {
    Ok(ModuleSource::read(path)?.body)
}

/// Basename of a module path, which is also its invocation name
pub fn module_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Fields of the first header line keyed by `pattern`.
///
/// The leading pattern is removed and empty fields dropped. Returns `None`
/// when no line matches or nothing is left after the pattern.
pub fn header_line(header: &[String], pattern: &str) -> Option<Vec<String>> {
    header
        .iter()
        .map(|h| h.trim_matches(|c: char| c == COMMENT || c.is_whitespace()))
        .find_map(|line| keyed_fields(line, pattern))
        .filter(|fields| !fields.is_empty())
}

/// Fields after the key when `line` is keyed by `pattern`.
///
/// The first field must equal the pattern. A `key:` pattern may also be
/// glued to its value ("prereq:foo" yields "foo").
fn keyed_fields(line: &str, pattern: &str) -> Option<Vec<String>> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?;
    let tail = if first == pattern {
        ""
    } else if pattern.ends_with(':') {
        first.strip_prefix(pattern)?
    } else {
        return None;
    };

    let mut rest: Vec<String> = Vec::new();
    if !tail.is_empty() {
        rest.push(tail.to_string());
    }
    rest.extend(fields.map(str::to_string));
    Some(rest)
}
