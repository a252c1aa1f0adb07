//! Pipeline script output
//!
//! The assembled script is the interpreter marker, a short provenance
//! block, then one invocation per line.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::ScriptError;
use crate::header::SHEBANG;
use crate::template::RenderedBody;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d -- %H:%M:%S";

/// Characters trimmed from both ends of a pipeline name
const PUNCTUATION: &[char] = &[
    ',', '.', '/', ';', '\'', '[', ']', '\\', '|', '_', '=', '+', '<', '>', '?', ':', '{', '}',
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '`', '~', '"',
];

/// Turn an arbitrary name into a file-name friendly one.
pub fn mangle(name: &str) -> String {
    name.replace(' ', "-").trim_matches(PUNCTUATION).to_string()
}

/// A rendered pipeline ready to be written
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub created: String,
    pub user: String,
    pub commands: Vec<String>,
}

impl Script {
    pub fn new(name: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            name: name.into(),
            created: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            user: std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
            commands,
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{}\n# scriptuit pipeline: {}\n# created {} by {}\n\n",
            SHEBANG, self.name, self.created, self.user
        );
        for command in &self.commands {
            text.push_str(command);
            text.push('\n');
        }
        text
    }

    pub fn write(&self, path: &Path) -> Result<(), ScriptError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            ensure_writable(dir)?;
        }
        fs::write(path, self.to_text())?;
        info!(path = %path.display(), commands = self.commands.len(), "wrote pipeline script");
        Ok(())
    }
}

/// Default script location for a pipeline name
pub fn script_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.sh", mangle(name)))
}

/// Write rendered bodies as `<dir>/<NN>_<module>`, in pipeline order.
pub fn write_bodies(dir: &Path, bodies: &[RenderedBody]) -> Result<Vec<PathBuf>, ScriptError> {
    ensure_writable(dir)?;
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let path = dir.join(format!("{:02}_{}", i + 1, body.module));
            fs::write(&path, body.to_text())?;
            Ok(path)
        })
        .collect()
}

/// Fail unless the current user can create files in `dir`.
///
/// Creates and removes a scratch file; permission bits alone do not say
/// what the running user may do.
pub fn ensure_writable(dir: &Path) -> Result<(), ScriptError> {
    let scratch = NamedTempFile::new_in(dir).and_then(|file| file.close());
    if let Err(e) = scratch {
        debug!(dir = %dir.display(), error = %e, "write check failed");
        return Err(ScriptError::NotWritable {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}
