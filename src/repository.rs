//! # Git Operations
//!
//! The engine treats git as an opaque collaborator: it clones, checks out and
//! runs arbitrary subcommands, and only cares whether each call succeeded.
//! That contract is the [`GitOperations`] trait.
//!
//! ## Design
//!
//! Separating the contract from the implementation lets the traversal logic be
//! exercised without a git binary. In the application,
//! [`DefaultGitOperations`] shells out to the configured git program via the
//! functions in [`crate::git`]. In tests, a mock records the calls and
//! simulates a clone by writing files into an in-memory filesystem.

use std::path::Path;

use crate::defaults::DEFAULT_GIT_PROGRAM;
use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clone `repo` at `branch` into `path`, passing `args` through to
    /// `git clone`.
    fn clone_repository(&self, path: &Path, repo: &str, branch: &str, args: &[String])
        -> Result<()>;

    /// Check out `branch` in the repository at `path`.
    fn checkout(&self, path: &Path, branch: &str) -> Result<()>;

    /// Run `git <subcommand> [args...]` in the repository at `path`.
    fn run_command(&self, path: &Path, subcommand: &str, args: &[String]) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses a git
/// executable to perform real Git operations.
#[derive(Debug, Clone)]
pub struct DefaultGitOperations {
    program: String,
}

impl DefaultGitOperations {
    /// Use `program` (a name looked up on `PATH`, or a path) as the git
    /// executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for DefaultGitOperations {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_PROGRAM)
    }
}

impl GitOperations for DefaultGitOperations {
    fn clone_repository(
        &self,
        path: &Path,
        repo: &str,
        branch: &str,
        args: &[String],
    ) -> Result<()> {
        crate::git::clone(&self.program, path, repo, branch, args)
    }

    fn checkout(&self, path: &Path, branch: &str) -> Result<()> {
        crate::git::checkout(&self.program, path, branch)
    }

    fn run_command(&self, path: &Path, subcommand: &str, args: &[String]) -> Result<()> {
        crate::git::run(&self.program, path, subcommand, args)
    }
}
