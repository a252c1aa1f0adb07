//! Interactive module menu
//!
//! Shows the candidate modules and adds the chosen ones to a
//! [`PipelineBuilder`] until the user is done or types `stop`.

use std::path::PathBuf;

use tracing::debug;

use crate::collector::STOP;
use crate::console::{columns, Console};
use crate::discovery::module_names;
use crate::error::ScriptError;
use crate::module::Module;
use crate::pipeline::{BuildOutcome, BuildReport, PipelineBuilder, StepOutcome};

pub const MENU_PROMPT: &str = "module #: ";

/// Answer that finishes the menu
pub const DONE: &str = "done";

/// Build a pipeline by picking modules from `candidates` one at a time.
///
/// A rejected option answer drops only the module being added; the menu is
/// shown again. Schema and prerequisite errors still abort.
pub fn interactive_build<C: Console + ?Sized>(
    candidates: &[PathBuf],
    console: &mut C,
    inline: bool,
) -> Result<BuildReport, ScriptError> {
    let names = module_names(candidates);
    let numbered: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}: {}", i + 1, name))
        .collect();

    let mut builder = PipelineBuilder::new(console).with_inline_bodies(inline);
    loop {
        let choice = {
            let console = builder.console();
            console.print("");
            for row in columns(&numbered) {
                console.print(&format!("    {}", row));
            }
            console.prompt(MENU_PROMPT)?
        };

        let choice = match choice.as_deref().map(str::trim) {
            None | Some(STOP) => return Ok(builder.finish(BuildOutcome::Cancelled)),
            Some("") | Some(DONE) => return Ok(builder.finish(BuildOutcome::Completed)),
            Some(choice) => choice.to_string(),
        };

        let Some(path) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| candidates.get(i))
        else {
            builder.console().print("ERROR: option # invalid.");
            continue;
        };

        let module = Module::load(path)?;
        debug!(module = %module.name, "module chosen");
        match builder.add_module(&module)? {
            StepOutcome::Rendered(command) => builder.console().print(&format!("+ {}", command)),
            StepOutcome::Invalid(_) => {}
            StepOutcome::Cancelled => return Ok(builder.finish(BuildOutcome::Cancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use std::fs;

    fn modules_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("init_epi"),
            "#!/bin/bash\n# output: func\n# init_epi runs\n# runs: number of runs [int]\necho $1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("dm_smooth"),
            "#!/bin/bash\n# prereq: init_*\n# dm_smooth input\necho $1\n",
        )
        .unwrap();
        dir
    }

    fn candidates(dir: &tempfile::TempDir) -> Vec<PathBuf> {
        let mut paths = vec![dir.path().join("dm_smooth"), dir.path().join("init_epi")];
        paths.sort();
        paths
    }

    #[test]
    fn test_menu_builds_until_done() {
        let dir = modules_dir();
        // 1: dm_smooth, 2: init_epi
        let mut console = ScriptedConsole::new(["2", "3", "1", "done"]);
        let report = interactive_build(&candidates(&dir), &mut console, false).unwrap();

        assert_eq!(report.commands, ["init_epi 3", "dm_smooth func"]);
        assert_eq!(report.outcome, BuildOutcome::Completed);
    }

    #[test]
    fn test_menu_invalid_answer_keeps_going() {
        let dir = modules_dir();
        let mut console = ScriptedConsole::new(["2", "-4", "9", "2", "1", ""]);
        let report = interactive_build(&candidates(&dir), &mut console, false).unwrap();

        assert_eq!(report.commands, ["init_epi 1"]);
        assert!(console.transcript().iter().any(|l| l.contains("init_epi not added")));
        assert!(console.transcript().iter().any(|l| l == "ERROR: option # invalid."));
    }

    #[test]
    fn test_menu_stop_keeps_rendered_modules() {
        let dir = modules_dir();
        let mut console = ScriptedConsole::new(["2", "5", "2", "stop"]);
        let report = interactive_build(&candidates(&dir), &mut console, false).unwrap();

        assert_eq!(report.commands, ["init_epi 5"]);
        assert_eq!(report.outcome, BuildOutcome::Cancelled);
    }

    #[test]
    fn test_menu_prerequisite_error_aborts() {
        let dir = modules_dir();
        let mut console = ScriptedConsole::new(["1"]);
        let err = interactive_build(&candidates(&dir), &mut console, false).unwrap_err();
        assert!(matches!(err, ScriptError::UnmetPrerequisite { .. }));
    }
}
