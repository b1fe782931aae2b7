//! Default values for gil configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication. Each value can be
//! overridden from the command line or the environment where noted.

/// Name of the manifest file looked up in every directory.
pub const MANIFEST_FILE_NAME: &str = ".gitlinks";

/// Git executable used when neither `--git` nor `GIL_GIT` is given.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Log filter used when neither `--log-level` nor `GIL_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_file_name_is_hidden_file() {
        assert!(MANIFEST_FILE_NAME.starts_with('.'));
        assert!(!MANIFEST_FILE_NAME.contains('/'));
    }
}
