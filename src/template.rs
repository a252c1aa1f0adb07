//! Module body rendering
//!
//! Inlines an invocation into a module body: for each positional index `i`
//! (1-based, after the module name) the first `${i}` or `$i` placeholder in
//! the body is replaced by the i-th token of the invocation. Only that one
//! occurrence is replaced; later occurrences stay as they are.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `${12}` or `$12`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\d+)\}|\$(\d+)").expect("valid placeholder regex"));

/// A module body with placeholders replaced by literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub module: String,
    pub lines: Vec<String>,
}

impl RenderedBody {
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Substitute the invocation's positional values into `body`.
///
/// Placeholders are located in the original body, so a value that looks
/// like a placeholder is never substituted again.
pub fn render_body(body: &[String], invocation: &str) -> Vec<String> {
    let mut edits: Vec<(usize, Range<usize>, &str)> = Vec::new();
    for (index, value) in invocation.split_whitespace().enumerate().skip(1) {
        let hit = body
            .iter()
            .enumerate()
            .find_map(|(n, line)| find_placeholder(line, index).map(|range| (n, range)));

        match hit {
            Some((n, range)) => edits.push((n, range, value)),
            None => debug!(index, "no placeholder for positional value"),
        }
    }

    // right to left within a line keeps the remaining ranges valid
    edits.sort_by(|a, b| (b.0, b.1.start).cmp(&(a.0, a.1.start)));

    let mut lines = body.to_vec();
    for (n, range, value) in edits {
        lines[n].replace_range(range, value);
    }
    lines
}

/// Byte range of the first placeholder for `index` in `line`
fn find_placeholder(line: &str, index: usize) -> Option<Range<usize>> {
    PLACEHOLDER.captures_iter(line).find_map(|caps| {
        let number = caps.get(1).or_else(|| caps.get(2))?;
        let whole = caps.get(0)?;
        (number.as_str().parse::<usize>().ok() == Some(index)).then(|| whole.range())
    })
}

/// Render the body of `module_name` for the given invocation.
pub fn render_module_body(module_name: &str, body: &[String], invocation: &str) -> RenderedBody {
    RenderedBody {
        module: module_name.to_string(),
        lines: render_body(body, invocation),
    }
}
