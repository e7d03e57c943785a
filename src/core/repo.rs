//! Git repository discovery and command-output capture.
//!
//! The single subprocess boundary of the crate: every other module
//! consumes captured text and never shells out.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepoError {
    /// Path is not inside a git repository.
    #[error("not inside a git repository")]
    NotARepo,
    /// Git command failed with an error message.
    #[error("git command failed: {0}")]
    GitError(String),
    /// I/O error during git operation.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Git output contained invalid UTF-8.
    #[error("invalid utf-8 in git output")]
    InvalidUtf8,
}

/// Canonicalized path to a git repository root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Discover the git repository containing the given path.
    ///
    /// Walks up the directory tree to find a `.git` directory.
    #[must_use = "this returns a Result that should be checked"]
    pub fn discover(path: &Path) -> Result<Self, RepoError> {
        let output = Command::new("git")
            .arg("rev-parse")
            .arg("--show-toplevel")
            .current_dir(path)
            .output()?;

        if !output.status.success() {
            return Err(RepoError::NotARepo);
        }

        let root = std::str::from_utf8(&output.stdout)
            .map_err(|_| RepoError::InvalidUtf8)?
            .trim();

        let canonical = PathBuf::from(root)
            .canonicalize()
            .map_err(|_| RepoError::NotARepo)?;

        Ok(Self(canonical))
    }

    /// Get the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Run git with the given arguments, capturing stdout as text.
fn capture(root: &RepoRoot, args: &[&str]) -> Result<String, RepoError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root.path())
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RepoError::GitError(stderr.to_string()));
    }

    String::from_utf8(output.stdout).map_err(|_| RepoError::InvalidUtf8)
}

/// Capture the plain-format log across all refs.
#[must_use = "this returns a Result that should be checked"]
pub fn log_all(root: &RepoRoot) -> Result<String, RepoError> {
    capture(root, &["log", "--all"])
}

/// Capture `git show` for one commit, commit metadata preamble included.
#[must_use = "this returns a Result that should be checked"]
pub fn show_commit(root: &RepoRoot, commit: &str) -> Result<String, RepoError> {
    capture(root, &["--no-pager", "show", commit])
}

/// Capture the diff of a commit against its first parent, optionally up
/// to a second revision.
#[must_use = "this returns a Result that should be checked"]
pub fn diff_from_parent(
    root: &RepoRoot,
    commit: &str,
    until: Option<&str>,
) -> Result<String, RepoError> {
    let base = format!("{}~", commit);
    let mut args = vec!["--no-pager", "diff", base.as_str()];
    if let Some(until) = until {
        args.push(until);
    }
    capture(root, &args)
}

/// Web URL of the `origin` remote with a trailing `.git` stripped, or
/// `None` when the repository has no origin remote.
pub fn remote_origin_url(root: &RepoRoot) -> Option<String> {
    let raw = capture(root, &["remote", "get-url", "origin"]).ok()?;
    let url = raw.trim_end();
    let url = url.strip_suffix(".git").unwrap_or(url);
    if url.is_empty() {
        return None;
    }
    Some(url.to_string())
}
