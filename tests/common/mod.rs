//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and macros
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(".", manifests::LIBCORE);
//!     fixture.command().arg("context").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One repository in a vendor directory.
    pub const LIBCORE: &str = "libcore ./vendor/libcore git@host:core.git main\n";

    /// The same repository declared from a sibling directory.
    pub const SIBLING_LIBCORE: &str = "libcore ../vendor/libcore git@host:core.git main\n";

    /// A line with three tokens.
    pub const THREE_TOKENS: &str = "# deps\nlibcore ./vendor/libcore main\n";

    /// Comments and blank lines only.
    pub const EMPTY: &str = "# gil links\n\n";
}

/// A test fixture that provides a temporary directory tree of manifests and
/// fake checkouts.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(".", manifests::LIBCORE)
///     .with_checkout("vendor/libcore");
///
/// fixture.command().arg("link").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write a `.gitlinks` manifest into `dir` (relative to the fixture root).
    pub fn with_manifest(self, dir: &str, content: &str) -> Self {
        self.temp_dir
            .child(dir)
            .child(".gitlinks")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Make `dir` look like an existing checkout (a non-empty directory).
    pub fn with_checkout(self, dir: &str) -> Self {
        self.temp_dir
            .child(dir)
            .child(".git")
            .child("HEAD")
            .write_str("ref: refs/heads/main\n")
            .expect("Failed to write checkout marker");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    ///
    /// Symlinks in the temp location (such as `/var` on macOS) are resolved so
    /// paths compare equal to what the binary reports.
    pub fn path(&self) -> PathBuf {
        self.temp_dir
            .path()
            .canonicalize()
            .expect("Failed to resolve temp directory")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        self.command_in(".")
    }

    /// Create a command configured to run in `dir` below the fixture root.
    pub fn command_in(&self, dir: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gil");
        cmd.current_dir(self.path().join(dir))
            .env_remove("GIL_DIRECTORY")
            .env_remove("GIL_GIT")
            .env_remove("GIL_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a local git repository at `path` with one commit on `main`,
/// optionally containing a `.gitlinks` manifest.
///
/// Used by tests gated behind the `integration-tests` feature, which need a
/// git executable.
#[allow(dead_code)]
pub fn init_git_repo(path: &Path, manifest: Option<&str>) {
    std::fs::create_dir_all(path).expect("Failed to create repository directory");
    git(path, &["init", "--quiet", "--initial-branch=main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test"]);
    std::fs::write(path.join("README.md"), "test repository\n").expect("Failed to write README");
    if let Some(content) = manifest {
        std::fs::write(path.join(".gitlinks"), content).expect("Failed to write manifest");
    }
    git(path, &["add", "."]);
    git(path, &["commit", "--quiet", "-m", "Initial commit"]);
}

/// Run git in `path`, panicking on failure.
#[allow(dead_code)]
pub fn git(path: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(path)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest("app", manifests::LIBCORE);
        assert!(fixture.path().join("app/.gitlinks").is_file());
    }

    #[test]
    fn test_fixture_with_checkout() {
        let fixture = TestFixture::new().with_checkout("vendor/libcore");
        assert!(fixture.path().join("vendor/libcore/.git/HEAD").is_file());
    }
}
