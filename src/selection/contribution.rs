//! Contribution file selection
//!
//! Walks a checkout for recognized source files outside vendored and build
//! directories, then keeps the ones the target author owns a meaningful
//! share of according to blame.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ProjectConfig;
use crate::git::{GitBlame, GitError};
use crate::models::ContributionFile;

/// Source files under `repo_path` eligible for attribution.
///
/// Paths are relative, `/`-separated and sorted, so the output does not
/// depend on filesystem enumeration order.
pub fn collect_candidate_files(repo_path: &Path, config: &ProjectConfig) -> Vec<String> {
    let excluded: HashSet<String> = config.exclude.effective_dirs().into_iter().collect();

    let walker = {
        let excluded = excluded.clone();
        WalkBuilder::new(repo_path)
            .standard_filters(false)
            .hidden(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let name = entry.file_name().to_string_lossy();
                !(is_dir && entry.depth() > 0 && excluded.contains(&*name))
            })
            .build()
    };

    let mut files = Vec::new();
    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(repo_path) else {
            continue;
        };

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.iter().any(|p| excluded.contains(p)) {
            continue;
        }

        let recognized = relative
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.extensions.is_recognized(ext));
        if !recognized {
            continue;
        }

        files.push(parts.join("/"));
    }

    files.sort();
    files
}

/// Files where `author` owns at least the configured share of lines.
///
/// Per-file blame failures are logged and skipped; an unreadable checkout
/// yields an empty list.
pub fn select_contribution_files(
    repo_path: &Path,
    author: &str,
    config: &ProjectConfig,
) -> Vec<ContributionFile> {
    let blame = match GitBlame::open(repo_path) {
        Ok(blame) => blame,
        Err(e) => {
            warn!("Cannot attribute files in {}: {}", repo_path.display(), e);
            return Vec::new();
        }
    };

    let threshold = config.selection.min_contribution_percentage;
    let mut contribution_files = Vec::new();

    for relative_path in collect_candidate_files(repo_path, config) {
        let ownership = match blame.file_ownership(&relative_path) {
            Ok(ownership) => ownership,
            Err(e @ GitError::UntrackedFile(_)) => {
                debug!("{}", e);
                continue;
            }
            Err(e) => {
                warn!("Error analyzing {}: {}", relative_path, e);
                continue;
            }
        };

        if let Some(&percentage) = ownership.get(author) {
            if percentage >= threshold {
                contribution_files.push(ContributionFile {
                    path: relative_path,
                    contribution_percentage: percentage,
                });
            }
        }
    }

    contribution_files
}
