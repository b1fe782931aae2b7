//! # Broadcast Command Implementations
//!
//! `pull`, `push`, `commit` and `run <subcommand>` all run one git subcommand
//! at the working path and then at every repository its manifests declare,
//! recursively, checking out each declared branch first. The first failure
//! stops the walk.
//!
//! ```bash
//! gil pull --rebase
//! gil commit -a -m "Bump dependencies"
//! gil run fetch --all
//! ```

use anyhow::{Context, Result};
use clap::Args;

use gil::output::emoji;

use super::discovered_workspace;
use crate::cli::GlobalOptions;

/// Arguments passed through to the git subcommand
#[derive(Args, Debug)]
pub struct GitArgs {
    /// Arguments passed through to git
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "GIT_ARGS")]
    pub args: Vec<String>,
}

/// Run any git subcommand in every linked repository
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Git subcommand to run (for example `fetch` or `status`)
    pub subcommand: String,

    /// Arguments passed through to git
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "GIT_ARGS")]
    pub args: Vec<String>,
}

/// Execute a broadcast of `git <subcommand> [args...]`.
pub fn execute(subcommand: &str, args: Vec<String>, globals: &GlobalOptions) -> Result<()> {
    let workspace = discovered_workspace(globals)?;
    let visited = workspace
        .command(subcommand, &args)
        .with_context(|| format!("Failed to run git {} across git links", subcommand))?;

    println!(
        "{} Ran git {} in {} repositories",
        emoji(&globals.output, "🚀", "[RUN]"),
        subcommand,
        visited
    );
    Ok(())
}
