//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gil::defaults::{DEFAULT_GIT_PROGRAM, DEFAULT_LOG_LEVEL};
use gil::output::OutputConfig;

use crate::commands;

/// Git links - clone, link and drive a tree of git repositories
#[derive(Parser, Debug)]
#[command(name = "gil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Run as if gil was started in DIR instead of the current directory
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        env = "GIL_DIRECTORY"
    )]
    directory: Option<PathBuf>,

    /// Git executable to run
    #[arg(
        long,
        global = true,
        value_name = "PROGRAM",
        env = "GIL_GIT",
        default_value = DEFAULT_GIT_PROGRAM
    )]
    git: String,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        env = "GIL_LOG",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the resolved git links context
    Context(commands::context::ContextArgs),

    /// Clone missing git repositories
    Clone(commands::clone::CloneArgs),

    /// Create or repair links to already cloned repositories
    Link,

    /// Clone missing repositories, then link
    Update,

    /// Run `git pull` in every linked repository
    Pull(commands::broadcast::GitArgs),

    /// Run `git push` in every linked repository
    Push(commands::broadcast::GitArgs),

    /// Run `git commit` in every linked repository
    Commit(commands::broadcast::GitArgs),

    /// Run any git subcommand in every linked repository
    Run(commands::broadcast::RunArgs),

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Absolute working path
    pub directory: PathBuf,
    pub git: String,
    pub output: OutputConfig,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let globals = GlobalOptions {
            directory: working_directory(self.directory)?,
            git: self.git,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Context(args) => commands::context::execute(args, &globals),
            Commands::Clone(args) => commands::clone::execute(args, &globals),
            Commands::Link => commands::link::execute(&globals),
            Commands::Update => commands::update::execute(&globals),
            Commands::Pull(args) => commands::broadcast::execute("pull", args.args, &globals),
            Commands::Push(args) => commands::broadcast::execute("push", args.args, &globals),
            Commands::Commit(args) => commands::broadcast::execute("commit", args.args, &globals),
            Commands::Run(args) => {
                commands::broadcast::execute(&args.subcommand, args.args, &globals)
            }
            Commands::Version => commands::version::execute(),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route the `log` facade to stderr, filtered by `level` (an `env_logger`
/// filter such as `info` or `gil=debug`).
fn init_logging(level: &str) {
    env_logger::Builder::new()
        .parse_filters(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Absolute working path: `directory` when given (relative to the process
/// working directory), the process working directory otherwise.
fn working_directory(directory: Option<PathBuf>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    let path = match directory {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => current.join(dir),
        None => current,
    };
    Ok(gil::path::normalize(&path))
}
