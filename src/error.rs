//! # Error Handling
//!
//! This module defines the centralized error type for the `gil` library. It
//! uses `thiserror` to build a single `Error` enum covering every failure the
//! manifest engine can report, each variant carrying enough context (file,
//! line, repository, path) for the operator to fix the cause and re-run.
//!
//! ## Key Components
//!
//! - **`Error`**: all failure modes of discovery, cloning, linking and
//!   command broadcast.
//! - **`Result<T>`**: alias for `std::result::Result<T, Error>`.
//!
//! Every error is fatal to the operation that raised it. There is no retry
//! and no continue-on-error mode; discovery, clone and link are idempotent, so
//! re-running after fixing the problem picks up where the last run stopped.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for gil operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest line did not split into exactly four tokens.
    #[error("{}:{line}: Invalid git link format! Must be in the form of 'name path repo branch' (got: {content})", file.display())]
    ManifestFormat {
        file: PathBuf,
        /// 1-based line number within the manifest file
        line: usize,
        content: String,
    },

    /// A repository path required by a manifest is missing or empty after
    /// cloning and link reconciliation.
    #[error("{}:{line}: Invalid git link path! Please check {name} git repository in {}", file.display(), path.display())]
    InvalidLink {
        file: PathBuf,
        line: usize,
        name: String,
        path: PathBuf,
    },

    /// `git clone` could not be started or exited unsuccessfully.
    #[error("Failed to run git clone {repo} branch \"{branch}\" into {}: {message}", path.display())]
    CloneFailed {
        repo: String,
        branch: String,
        path: PathBuf,
        message: String,
    },

    /// `git checkout` could not be started or exited unsuccessfully.
    #[error("Failed to run git checkout branch \"{branch}\" in {}: {message}", path.display())]
    CheckoutFailed {
        branch: String,
        path: PathBuf,
        message: String,
    },

    /// A broadcast git subcommand could not be started or exited
    /// unsuccessfully.
    #[error("Failed to run git {command} in {}: {message}", path.display())]
    CommandFailed {
        command: String,
        path: PathBuf,
        message: String,
    },

    /// A filesystem collaborator rejected an operation (for example removing
    /// a non-empty directory or following a symlink loop).
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
