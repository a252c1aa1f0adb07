//! Running record of a pipeline build
//!
//! Append-only: entries are never reordered or removed.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    outputs: Vec<String>,
    used_modules: Vec<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs declared by processed modules, oldest first
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Basenames of processed modules, in processing order
    pub fn used_modules(&self) -> &[String] {
        &self.used_modules
    }

    /// The output an `input` argument resolves to
    pub fn latest_output(&self) -> Option<&str> {
        self.outputs.last().map(String::as_str)
    }

    pub(crate) fn push_output(&mut self, output: impl Into<String>) {
        self.outputs.push(output.into());
    }

    pub(crate) fn push_module(&mut self, module: impl Into<String>) {
        self.used_modules.push(module.into());
    }
}
