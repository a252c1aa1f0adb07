//! Optional `scriptuit.yaml` configuration
//!
//! ```yaml
//! modules_dir: ./modules
//! output_dir: ./out
//! include: ""
//! exclude: old
//! depth: 1
//! inline: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::discovery::ModuleSearch;
use crate::error::ScriptError;

pub const DEFAULT_CONFIG_FILE: &str = "scriptuit.yaml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub modules_dir: PathBuf,
    pub output_dir: PathBuf,
    pub include: String,
    pub exclude: Option<String>,
    pub depth: usize,
    pub inline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            include: String::new(),
            exclude: None,
            depth: 1,
            inline: false,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        if config.depth == 0 {
            return Err(ScriptError::Config("depth must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Load `path`, or `./scriptuit.yaml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "loading configuration");
        let yaml = fs::read_to_string(&path)?;
        Self::from_yaml(&yaml)
    }

    pub fn search(&self) -> ModuleSearch {
        ModuleSearch {
            dir: self.modules_dir.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            depth: self.depth,
        }
    }
}
