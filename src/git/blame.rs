//! Git blame integration for line-level authorship
//!
//! Computes, for a single file at HEAD, the share of lines each author
//! last touched. Percentages are per file and sum to 100 across that
//! file's authors.

use git2::{Repository, Status};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{open_repository, GitError, GitResult};

/// Git blame analyzer for one checkout.
pub struct GitBlame {
    repo: Repository,
}

impl GitBlame {
    /// Open a checkout for blame analysis.
    pub fn open(path: &Path) -> GitResult<Self> {
        Ok(Self {
            repo: open_repository(path)?,
        })
    }

    /// Count blamed lines per author name for a file at HEAD.
    ///
    /// Returns the per-author counts and the total. Every line blame
    /// reports is counted, blank and comment lines included.
    pub fn author_line_counts(&self, file_path: &str) -> GitResult<(HashMap<String, u32>, u32)> {
        let blame = self
            .repo
            .blame_file(Path::new(file_path), None)
            .map_err(|e| self.classify_blame_error(file_path, e))?;

        let mut author_lines: HashMap<String, u32> = HashMap::new();
        let mut total_lines: u32 = 0;

        for hunk in blame.iter() {
            let sig = hunk.final_signature();
            let author = sig.name().unwrap_or("Unknown").to_string();
            let lines = hunk.lines_in_hunk() as u32;
            *author_lines.entry(author).or_insert(0) += lines;
            total_lines += lines;
        }

        Ok((author_lines, total_lines))
    }

    /// Ownership of a file: author -> percentage of lines (0-100, unrounded).
    ///
    /// A file with no blamed lines yields an empty map.
    pub fn file_ownership(&self, file_path: &str) -> GitResult<HashMap<String, f64>> {
        let (author_lines, total_lines) = self.author_line_counts(file_path)?;
        if total_lines == 0 {
            return Ok(HashMap::new());
        }

        Ok(author_lines
            .into_iter()
            .map(|(author, lines)| (author, lines as f64 / total_lines as f64 * 100.0))
            .collect())
    }

    fn classify_blame_error(&self, file_path: &str, err: git2::Error) -> GitError {
        match self.repo.status_file(Path::new(file_path)) {
            Ok(status) if status.contains(Status::WT_NEW) || status.contains(Status::IGNORED) => {
                GitError::UntrackedFile(file_path.to_string())
            }
            _ if err.code() == git2::ErrorCode::NotFound => {
                GitError::UntrackedFile(file_path.to_string())
            }
            _ => GitError::Git(err),
        }
    }
}

/// Author percentages for one file, or an empty map when blame fails.
///
/// Failure here is expected for untracked or odd files, so it is logged
/// at debug level and swallowed.
pub fn author_stats(repo_path: &Path, file_path: &str) -> HashMap<String, f64> {
    let result = GitBlame::open(repo_path).and_then(|blame| blame.file_ownership(file_path));
    match result {
        Ok(stats) => stats,
        Err(e) => {
            debug!("Skipping blame for {}: {}", file_path, e);
            HashMap::new()
        }
    }
}
