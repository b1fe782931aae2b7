//! # Clone Command Implementation
//!
//! This module implements the `clone` subcommand, which clones every
//! repository the working path's manifests declare that is not on disk yet.
//! Newly cloned repositories have their own manifests read straight away, so
//! a single run clones the whole tree.
//!
//! Extra arguments are passed through to every `git clone`, for example
//! `gil clone --depth 1`.

use anyhow::{Context, Result};
use clap::Args;

use gil::output::emoji;

use super::discovered_workspace;
use crate::cli::GlobalOptions;

/// Clone missing git repositories
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Arguments passed through to `git clone`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "GIT_ARGS")]
    pub args: Vec<String>,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, globals: &GlobalOptions) -> Result<()> {
    let mut workspace = discovered_workspace(globals)?;
    let report = workspace
        .clone_missing(&args.args)
        .context("Failed to clone git repositories")?;

    println!(
        "{} Cloned {} repositories ({} already present)",
        emoji(&globals.output, "📥", "[CLONE]"),
        report.cloned.len(),
        report.present
    );
    Ok(())
}
