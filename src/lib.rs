//! scriptuit - builds sequential shell pipelines from self-describing modules

pub mod collector;
pub mod config;
pub mod console;
pub mod discovery;
pub mod error;
pub mod header;
pub mod menu;
pub mod module;
pub mod pipeline;
pub mod prereq;
pub mod render;
pub mod schema;
pub mod script;
pub mod state;
pub mod template;

pub use collector::{InvalidInput, InvalidReason, OptionCollector, Resolution};
pub use config::Config;
pub use console::{Console, ScriptedConsole, StdConsole};
pub use discovery::ModuleSearch;
pub use error::{ErrorKind, FixSuggestion, ScriptError};
pub use module::Module;
pub use pipeline::{build, BuildOutcome, BuildReport, DroppedModule, PipelineBuilder, StepOutcome};
pub use schema::{OptionSpec, TypeTag};
pub use script::Script;
pub use state::PipelineState;
pub use template::{render_body, RenderedBody};
