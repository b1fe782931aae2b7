//! # Manifest Records and Reader
//!
//! A manifest is a `.gitlinks` file inside any directory. Every non-empty,
//! non-comment line declares one repository link as four whitespace-separated
//! fields:
//!
//! ```text
//! # name    path               repo                      branch
//! libcore   ./vendor/libcore   git@host:core.git         main
//! docs      "third party/docs" https://example/docs.git  'release 2'
//! ```
//!
//! Fields may be wrapped in single or double quotes to contain whitespace, and
//! `\"` / `\'` inside a field unescape to literal quotes. The `path` field is
//! resolved relative to the directory that owns the manifest, never the
//! process working directory.
//!
//! Two records are the same logical repository when their [`Identity`]
//! (`name`, `repo`, `branch`) matches; `path` only says where one particular
//! manifest wants that repository to appear.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::defaults::MANIFEST_FILE_NAME;
use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::path::resolve;

/// Quote-aware token pattern: a double-quoted run, a single-quoted run, or a
/// run of non-whitespace.
const TOKEN_PATTERN: &str = r#""(?:\\.|[^"])*"|'(?:\\.|[^'])*'|\S+"#;

/// The deduplication key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Identity {
    pub name: String,
    pub repo: String,
    pub branch: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{})", self.name, self.repo, self.branch)
    }
}

/// One repository link declared by a manifest line.
///
/// Records are immutable once constructed. They order by `name` first so
/// traversal and clone order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    name: String,
    path: PathBuf,
    repo: String,
    branch: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path where the declaring manifest expects the repository.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn identity(&self) -> Identity {
        Identity {
            name: self.name.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
        }
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.repo.cmp(&other.repo))
            .then_with(|| self.branch.cmp(&other.branch))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.path.display(),
            self.repo,
            self.branch
        )
    }
}

/// A record together with the manifest line that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 1-based line number within the manifest file
    pub line: usize,
    pub record: Record,
}

/// A parsed manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Path of the manifest file itself
    pub file: PathBuf,
    /// Directory owning the manifest; record paths are resolved against it
    pub directory: PathBuf,
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Records in file line order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits manifest lines into tokens, preserving quoted substrings.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    pub fn tokenize(&self, line: &str) -> Vec<String> {
        self.pattern
            .find_iter(line)
            .map(|token| {
                strip_quotes(token.as_str())
                    .replace("\\\"", "\"")
                    .replace("\\'", "'")
            })
            .collect()
    }
}

/// Tokenize a single manifest line.
///
/// ```
/// let tokens = gil::manifest::tokenize(r#"alpha "my path" https://example/repo.git main"#).unwrap();
/// assert_eq!(tokens, ["alpha", "my path", "https://example/repo.git", "main"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    Ok(Tokenizer::new()?.tokenize(line))
}

fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last))
            if bytes.len() >= 2 && (first == b'"' || first == b'\'') && first == last =>
        {
            &token[1..token.len() - 1]
        }
        _ => token,
    }
}

/// Parse the text of a manifest owned by `directory`.
///
/// Fails with [`Error::ManifestFormat`] on the first line that does not hold
/// exactly four tokens or has an empty name.
pub fn parse_manifest(directory: &Path, file: &Path, content: &str) -> Result<Manifest> {
    let tokenizer = Tokenizer::new()?;
    let mut entries = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        // Skip empty lines and comments
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let format_error = || Error::ManifestFormat {
            file: file.to_path_buf(),
            line: index + 1,
            content: line.to_string(),
        };

        let [name, path, repo, branch] =
            <[String; 4]>::try_from(tokenizer.tokenize(line)).map_err(|_| format_error())?;
        if name.is_empty() {
            return Err(format_error());
        }

        entries.push(Entry {
            line: index + 1,
            record: Record::new(name, resolve(directory, &path), repo, branch),
        });
    }

    Ok(Manifest {
        file: file.to_path_buf(),
        directory: directory.to_path_buf(),
        entries,
    })
}

/// Read the manifest of `directory`, if it has one.
pub fn read_manifest(fs: &dyn FileSystem, directory: &Path) -> Result<Option<Manifest>> {
    let file = directory.join(MANIFEST_FILE_NAME);
    if !fs.is_file(&file) {
        return Ok(None);
    }

    let content = fs.read_to_string(&file)?;
    parse_manifest(directory, &file, &content).map(Some)
}
