//! Invocation line rendering
//!
//! `<module> [<latest output>] <option values...>`

use tracing::info;

use crate::error::ScriptError;
use crate::module::Module;
use crate::state::PipelineState;

/// Latest upstream output when `module` takes an input, `None` otherwise.
///
/// Fails when the module takes an input and nothing upstream produced one.
pub fn upstream_input<'s>(
    module: &Module,
    state: &'s PipelineState,
) -> Result<Option<&'s str>, ScriptError> {
    if !module.takes_input() {
        return Ok(None);
    }
    state
        .latest_output()
        .map(Some)
        .ok_or_else(|| ScriptError::NoUpstreamOutput {
            module: module.name.clone(),
        })
}

/// Render the invocation of `module` with its resolved option values and
/// record the module (and its output, if any) in the returned state.
pub fn render_command(
    module: &Module,
    values: &[String],
    mut state: PipelineState,
) -> Result<(String, PipelineState), ScriptError> {
    let mut parts: Vec<&str> = Vec::with_capacity(values.len() + 2);
    parts.push(&module.name);
    if let Some(input) = upstream_input(module, &state)? {
        parts.push(input);
    }
    parts.extend(values.iter().map(String::as_str));
    let command = parts.join(" ");

    if let Some(output) = &module.output {
        state.push_output(output.clone());
    }
    state.push_module(module.name.clone());

    info!(module = %module.name, command = %command, "rendered invocation");
    Ok((command, state))
}
