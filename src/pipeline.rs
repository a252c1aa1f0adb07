//! Pipeline build loop
//!
//! Owns the [`PipelineState`] and the rendered lines. Each module goes
//! through the same gates, in order:
//!
//! 1. prerequisites met by modules already added
//! 2. an upstream output exists if the module takes an input
//! 3. every option resolved interactively
//! 4. invocation rendered, state updated
//!
//! Gates 1 and 2 fail with a [`ScriptError`] and abort the build. Gate 3
//! may end in a rejected answer (only this module is dropped, later modules
//! still run) or a cancellation (the caller stops adding modules).

use tracing::{info, warn};

use crate::collector::{InvalidInput, OptionCollector, Resolution};
use crate::console::Console;
use crate::error::ScriptError;
use crate::module::Module;
use crate::prereq::validate_prerequisites;
use crate::render::{render_command, upstream_input};
use crate::state::PipelineState;
use crate::template::{render_module_body, RenderedBody};

/// Result of adding one module
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The invocation line now appended to the script
    Rendered(String),
    /// A rejected answer; nothing was appended
    Invalid(InvalidInput),
    /// The user typed `stop`; nothing was appended
    Cancelled,
}

/// How a whole build ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Completed,
    Cancelled,
}

/// A module left out of the script because of a rejected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedModule {
    pub module: String,
    pub input: InvalidInput,
}

/// Everything a build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub commands: Vec<String>,
    pub bodies: Vec<RenderedBody>,
    pub state: PipelineState,
    /// Modules skipped after a rejected answer, in build order
    pub dropped: Vec<DroppedModule>,
    pub outcome: BuildOutcome,
}

impl BuildReport {
    /// Fails with SCR-030 when any module was dropped.
    pub fn into_result(self) -> Result<Self, ScriptError> {
        if self.dropped.is_empty() {
            return Ok(self);
        }
        Err(ScriptError::InvalidInput {
            modules: self.dropped.iter().map(|d| d.module.clone()).collect(),
        })
    }
}

/// Incrementally assembles a pipeline script
pub struct PipelineBuilder<'c, C: Console + ?Sized> {
    console: &'c mut C,
    state: PipelineState,
    commands: Vec<String>,
    bodies: Vec<RenderedBody>,
    dropped: Vec<DroppedModule>,
    inline: bool,
}

impl<'c, C: Console + ?Sized> PipelineBuilder<'c, C> {
    pub fn new(console: &'c mut C) -> Self {
        Self {
            console,
            state: PipelineState::new(),
            commands: Vec::new(),
            bodies: Vec::new(),
            dropped: Vec::new(),
            inline: false,
        }
    }

    /// Also render each module's body with its resolved invocation
    pub fn with_inline_bodies(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn console(&mut self) -> &mut C {
        &mut *self.console
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Run one module through all gates.
    pub fn add_module(&mut self, module: &Module) -> Result<StepOutcome, ScriptError> {
        let prerequisites =
            (!module.prerequisites.is_empty()).then_some(module.prerequisites.as_slice());
        if let Err(err) =
            validate_prerequisites(&module.name, prerequisites, self.state.used_modules())
        {
            self.console
                .print(&format!("prerequisites: {}", module.prerequisites.join(" ")));
            return Err(err);
        }
        upstream_input(module, &self.state)?;

        let values = match OptionCollector::new(&mut *self.console).collect(module)? {
            Resolution::Resolved(values) => values,
            Resolution::Invalid(input) => {
                warn!(module = %module.name, %input, "module command dropped");
                self.console
                    .print(&format!("ERROR: {} not added ({})", module.name, input));
                self.dropped.push(DroppedModule {
                    module: module.name.clone(),
                    input: input.clone(),
                });
                return Ok(StepOutcome::Invalid(input));
            }
            Resolution::Cancelled => return Ok(StepOutcome::Cancelled),
        };

        let state = std::mem::take(&mut self.state);
        let (command, state) = render_command(module, &values, state)?;
        self.state = state;

        if self.inline {
            self.bodies
                .push(render_module_body(&module.name, &module.body, &command));
        }
        self.commands.push(command.clone());
        Ok(StepOutcome::Rendered(command))
    }

    pub fn finish(self, outcome: BuildOutcome) -> BuildReport {
        info!(
            modules = self.commands.len(),
            dropped = self.dropped.len(),
            outcome = ?outcome,
            "pipeline build finished"
        );
        BuildReport {
            commands: self.commands,
            bodies: self.bodies,
            state: self.state,
            dropped: self.dropped,
            outcome,
        }
    }
}

/// Build a pipeline from a fixed module sequence.
///
/// A rejected answer drops only that module; a module that needed it then
/// fails its prerequisite check. Cancellation stops the build and keeps
/// everything rendered before it.
pub fn build<C: Console + ?Sized>(
    modules: &[Module],
    console: &mut C,
    inline: bool,
) -> Result<BuildReport, ScriptError> {
    let mut builder = PipelineBuilder::new(console).with_inline_bodies(inline);

    for module in modules {
        if builder.add_module(module)? == StepOutcome::Cancelled {
            return Ok(builder.finish(BuildOutcome::Cancelled));
        }
    }
    Ok(builder.finish(BuildOutcome::Completed))
}
