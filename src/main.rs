//! # Git Links CLI
//!
//! This is the binary entry point for the `gil` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning library errors into a message on stderr and exit code 1 (clap
//!   itself exits with 2 on invalid usage).
//!
//! The traversal logic lives in the `gil` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
