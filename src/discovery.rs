//! Candidate module discovery

use std::path::PathBuf;

use walkdir::{DirEntry, WalkDir};

use crate::error::ScriptError;
use crate::header::module_name;

/// Where and how to look for modules
#[derive(Debug, Clone)]
pub struct ModuleSearch {
    pub dir: PathBuf,
    /// Substring a file name must contain
    pub include: String,
    /// Directories whose name contains this are skipped
    pub exclude: Option<String>,
    /// Levels below `dir` to descend into (1 = `dir` only)
    pub depth: usize,
}

impl ModuleSearch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            include: String::new(),
            exclude: None,
            depth: 1,
        }
    }

    /// Candidate module files, sorted by path
    pub fn find(&self) -> Result<Vec<PathBuf>, ScriptError> {
        let walker = WalkDir::new(&self.dir)
            .max_depth(self.depth.max(1))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.skipped(entry));

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ScriptError::Io(e.into()))?;
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy().contains(&self.include)
            {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }

    /// The candidate whose basename is exactly `name`
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ScriptError> {
        self.find()?
            .into_iter()
            .find(|path| module_name(path) == name)
            .ok_or_else(|| ScriptError::ModuleNotFound {
                name: name.to_string(),
                dir: self.dir.clone(),
            })
    }

    fn skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }
        match &self.exclude {
            Some(exclude) => entry.file_type().is_dir() && name.contains(exclude.as_str()),
            None => false,
        }
    }
}

/// Basenames of candidate modules, for menus
pub fn module_names(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| module_name(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn touch(path: &Path) {
        fs::write(path, "#!/bin/bash\n").unwrap();
    }

    #[test]
    fn test_find_respects_include_exclude_and_depth() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("extra/deeper")).unwrap();
        fs::create_dir_all(root.join("old_stuff")).unwrap();
        touch(&root.join("init_epi"));
        touch(&root.join("dm_smooth"));
        touch(&root.join(".hidden"));
        touch(&root.join("extra/dm_mask"));
        touch(&root.join("extra/deeper/dm_deep"));
        touch(&root.join("old_stuff/dm_old"));

        let mut search = ModuleSearch::new(root);
        assert_eq!(module_names(&search.find().unwrap()), ["dm_smooth", "init_epi"]);

        search.depth = 2;
        search.include = "dm_".into();
        search.exclude = Some("old".into());
        let names = module_names(&search.find().unwrap());
        assert_eq!(names, ["dm_smooth", "dm_mask"]);
    }

    #[test]
    fn test_resolve_by_basename() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("init_epi"));
        let search = ModuleSearch::new(dir.path());

        assert!(search.resolve("init_epi").unwrap().ends_with("init_epi"));
        let err = search.resolve("init").unwrap_err();
        assert!(matches!(err, ScriptError::ModuleNotFound { .. }));
    }
}
