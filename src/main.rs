//! scriptuit CLI - interactive pipeline script builder

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use scriptuit::discovery::module_names;
use scriptuit::header::read_body;
use scriptuit::menu::interactive_build;
use scriptuit::script::{script_path, write_bodies};
use scriptuit::{BuildOutcome, Config, FixSuggestion, Module, Script, ScriptError, StdConsole};

#[derive(Parser)]
#[command(name = "scriptuit")]
#[command(about = "Build sequential shell pipelines from self-describing modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./scriptuit.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG wins
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a pipeline script, interactively resolving module options
    Build {
        /// Modules in pipeline order (menu when omitted)
        modules: Vec<String>,

        /// Directory holding the modules
        #[arg(short = 'd', long)]
        modules_dir: Option<PathBuf>,

        /// Script path (default: <output_dir>/<name>.sh)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pipeline name
        #[arg(short, long, default_value = "pipeline")]
        name: String,

        /// Also write each module body with its values inlined
        #[arg(long)]
        inline: bool,
    },

    /// Show a module's prerequisites, output, arguments and options
    Inspect {
        /// Path to the module file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print a module body with an invocation's values substituted
    Render {
        /// Path to the module file
        file: PathBuf,

        /// Invocation line, e.g. "dm_smooth func 6.0"
        invocation: String,
    },

    /// List candidate modules
    List {
        /// Directory holding the modules
        #[arg(short = 'd', long)]
        modules_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        let suggestion = e
            .downcast_ref::<ScriptError>()
            .and_then(|e| e.fix_suggestion());
        if let Some(suggestion) = suggestion {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never mix with prompts or script text.
fn init_logging(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn check_os() -> Result<(), ScriptError> {
    if cfg!(windows) {
        return Err(ScriptError::UnsupportedPlatform { os: "Windows" });
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    check_os()?;
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            modules,
            modules_dir,
            output,
            name,
            inline,
        } => {
            if let Some(dir) = modules_dir {
                config.modules_dir = dir;
            }
            config.inline |= inline;
            build_pipeline(&config, &modules, output, &name)
        }
        Commands::Inspect { file, format } => inspect_module(&file, format),
        Commands::Render { file, invocation } => render_module(&file, &invocation),
        Commands::List { modules_dir } => {
            if let Some(dir) = modules_dir {
                config.modules_dir = dir;
            }
            list_modules(&config)
        }
    }
}

fn build_pipeline(
    config: &Config,
    modules: &[String],
    output: Option<PathBuf>,
    name: &str,
) -> Result<()> {
    let search = config.search();
    let mut console = StdConsole::new();

    let report = if modules.is_empty() {
        let candidates = search.find()?;
        interactive_build(&candidates, &mut console, config.inline)?
    } else {
        let parsed = modules
            .iter()
            .map(|name| Module::load(&search.resolve(name)?))
            .collect::<Result<Vec<_>, ScriptError>>()?;
        scriptuit::build(&parsed, &mut console, config.inline)?
    };

    if !report.commands.is_empty() {
        let path = output.unwrap_or_else(|| script_path(&config.output_dir, name));
        Script::new(name, report.commands.clone())
            .write(&path)
            .with_context(|| format!("Failed to write script {}", path.display()))?;

        if config.inline {
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            write_bodies(dir, &report.bodies)?;
        }
        println!(
            "{} {} module(s) written to {}",
            "✓".green(),
            report.commands.len(),
            path.display()
        );
    }

    if report.outcome == BuildOutcome::Cancelled {
        println!("{} build stopped", "→".cyan());
        return Ok(());
    }
    // the menu already let the user re-add a dropped module
    if !modules.is_empty() {
        report.into_result()?;
    }
    Ok(())
}

fn inspect_module(file: &Path, format: Format) -> Result<()> {
    let module = Module::load(file)?;

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&module).map_err(ScriptError::from)?;
            println!("{}", json);
        }
        Format::Text => {
            println!("{} {}", "module:".cyan().bold(), module.name);
            println!("  prerequisites: {}", join_or_none(&module.prerequisites));
            println!("  output: {}", module.output.as_deref().unwrap_or("none"));
            println!("  arguments: {}", join_or_none(&module.arguments));
            println!("  options:");
            for option in &module.schema {
                println!("    {:<16} [{}]", option.name, option.tag);
            }
        }
    }
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(" ")
    }
}

fn render_module(file: &Path, invocation: &str) -> Result<()> {
    let body = read_body(file)?;
    for line in scriptuit::render_body(&body, invocation) {
        println!("{}", line);
    }
    Ok(())
}

fn list_modules(config: &Config) -> Result<()> {
    let names = module_names(&config.search().find()?);
    if names.is_empty() {
        println!("None found.");
    }
    for name in names {
        println!("    + {}", name);
    }
    Ok(())
}
