//! Git access layer
//!
//! Wraps libgit2 for the three queries the profiler needs:
//!
//! - Line-level blame to compute per-author ownership of a file
//! - Commit history (whole repository and per file)
//! - Per-file commit diffs and file content at a revision
//!
//! # Example
//!
//! ```no_run
//! use codeprint::git::{GitBlame, GitHistory};
//! use std::path::Path;
//!
//! let blame = GitBlame::open(Path::new("/path/to/repo")).unwrap();
//! let ownership = blame.file_ownership("src/main.rs").unwrap();
//!
//! let history = GitHistory::open(Path::new("/path/to/repo")).unwrap();
//! let commits = history.file_history("src/main.rs").unwrap();
//! ```

pub mod blame;
pub mod diff;
pub mod history;

pub use blame::{author_stats, GitBlame};
pub use diff::clean_diff;
pub use history::{FileCommit, GitHistory};

use std::path::PathBuf;
use thiserror::Error;

/// Failures from git queries.
///
/// Callers use the variant to tell an untracked file apart from a broken
/// checkout or a libgit2 failure. Control flow is the same for all of them:
/// the unit is skipped.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("not a git checkout: {path}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("file is not tracked at HEAD: {0}")]
    UntrackedFile(String),

    #[error("{path} is not valid UTF-8 at {sha}")]
    InvalidUtf8 { path: String, sha: String },

    #[error("{path} does not exist at {sha}")]
    MissingPath { path: String, sha: String },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

pub type GitResult<T> = Result<T, GitError>;

/// Open a repository at exactly `path` (no parent discovery).
///
/// Checkouts live side by side under one user directory, so discovering
/// upwards could silently pick up an enclosing repository.
pub(crate) fn open_repository(path: &std::path::Path) -> GitResult<git2::Repository> {
    git2::Repository::open(path).map_err(|source| GitError::NotARepository {
        path: path.to_path_buf(),
        source,
    })
}
