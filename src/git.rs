use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::Error;

/// Run `git clone [args...] -b <branch> <repo> <path>`
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Any authentication configured in ~/.gitconfig
///
/// Output is inherited so progress and prompts reach the terminal.
pub fn clone(
    program: &str,
    path: &Path,
    repo: &str,
    branch: &str,
    args: &[String],
) -> Result<(), Error> {
    let clone_error = |message: String| Error::CloneFailed {
        repo: repo.to_string(),
        branch: branch.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let mut command = Command::new(program);
    command
        .arg("clone")
        .args(args)
        .args(["-b", branch, repo])
        .arg(path);
    debug!("Executing {:?}", command);

    let status = command.status().map_err(|e| clone_error(e.to_string()))?;
    if !status.success() {
        return Err(clone_error(status.to_string()));
    }

    Ok(())
}

/// Run `git checkout <branch>` inside `path`
pub fn checkout(program: &str, path: &Path, branch: &str) -> Result<(), Error> {
    let output = Command::new(program)
        .args(["checkout", branch])
        .current_dir(path)
        .output()
        .map_err(|e| Error::CheckoutFailed {
            branch: branch.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::CheckoutFailed {
            branch: branch.to_string(),
            path: path.to_path_buf(),
            message: failure_message(&output),
        });
    }

    Ok(())
}

/// Run `git <subcommand> [args...]` inside `path`
///
/// Output is inherited: the user asked for this command and wants to see what
/// it prints.
pub fn run(program: &str, path: &Path, subcommand: &str, args: &[String]) -> Result<(), Error> {
    let command_error = |message: String| Error::CommandFailed {
        command: subcommand.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let status = Command::new(program)
        .arg(subcommand)
        .args(args)
        .current_dir(path)
        .status()
        .map_err(|e| command_error(e.to_string()))?;

    if !status.success() {
        return Err(command_error(status.to_string()));
    }

    Ok(())
}

/// Prefer git's own stderr over the bare exit status
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    }
}
