//! # CLI Command Implementations
//!
//! Each subcommand of the `gil` tool lives in its own file with:
//! - an `Args` struct (when the command takes arguments), derived using `clap`
//! - an `execute` function that builds a [`Workspace`] for the working path
//!   and calls into the `gil` library.

pub mod broadcast;
pub mod clone;
pub mod completions;
pub mod context;
pub mod link;
pub mod update;
pub mod version;

use anyhow::{Context, Result};

use gil::phases::Workspace;

use crate::cli::GlobalOptions;

/// Build a workspace on the host filesystem for the working path, without
/// discovering anything yet.
pub fn workspace(globals: &GlobalOptions) -> Workspace {
    Workspace::new(globals.directory.clone(), &globals.git)
}

/// Build a workspace and discover its records.
pub fn discovered_workspace(globals: &GlobalOptions) -> Result<Workspace> {
    let mut workspace = workspace(globals);
    workspace.discover().with_context(|| {
        format!(
            "Failed to discover git links from {}",
            globals.directory.display()
        )
    })?;
    Ok(workspace)
}
