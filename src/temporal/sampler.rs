//! Commit-history sampling
//!
//! For each core file, up to three commits from its history are inspected:
//! the first, one near the middle (histories longer than four commits) and
//! the last. Each sample carries the cleaned diff of the file in that
//! commit. Full file content is attached to the first emitted sample and to
//! the final sample point only, which keeps the payload bounded.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::git::{clean_diff, FileCommit, GitHistory, GitResult};
use crate::models::{CommitRecord, Evolution, RepoEvolution};

/// Indices of the history entries to inspect, in history order.
pub fn sample_points(history_len: usize) -> Vec<usize> {
    let mut points = Vec::with_capacity(3);
    if history_len > 0 {
        points.push(0);
    }
    if history_len > 4 {
        points.push(history_len / 2);
    }
    if history_len > 1 {
        points.push(history_len - 1);
    }
    points
}

/// Sample the history of every core file, grouped by file.
///
/// Failures for a single file or commit are logged and skipped; an
/// unreadable checkout yields an empty map.
pub fn sample_commits(
    repo_path: &Path,
    core_files: &[String],
    max_diff_lines: usize,
) -> BTreeMap<String, Vec<CommitRecord>> {
    group_by_file(sample_records(repo_path, core_files, max_diff_lines))
}

/// Sampled evolution of a repository, or `None` when nothing was sampled.
pub fn sample_repository(
    repo_path: &Path,
    core_files: &[String],
    max_diff_lines: usize,
) -> Option<RepoEvolution> {
    let records = sample_records(repo_path, core_files, max_diff_lines);
    if records.is_empty() {
        return None;
    }

    info!(
        "Processed {} commits for {}",
        records.len(),
        repo_path.display()
    );
    Some(RepoEvolution {
        core_files: core_files.to_vec(),
        evolution: Evolution {
            commit_count: records.len(),
            commits_by_file: group_by_file(records),
        },
    })
}

/// All samples of all files, sorted by date.
fn sample_records(repo_path: &Path, core_files: &[String], max_diff_lines: usize) -> Vec<CommitRecord> {
    let history = match GitHistory::open(repo_path) {
        Ok(history) => history,
        Err(e) => {
            debug!("Cannot sample {}: {}", repo_path.display(), e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for file in core_files {
        match sample_file(&history, file, max_diff_lines) {
            Ok(samples) => records.extend(samples),
            Err(e) => debug!("Skipping history of {}: {}", file, e),
        }
    }

    records.sort_by_key(|r| r.date);
    records
}

/// Samples of one file, oldest first.
pub fn sample_file(
    history: &GitHistory,
    file: &str,
    max_diff_lines: usize,
) -> GitResult<Vec<CommitRecord>> {
    let commits = history.file_history(file)?;
    let points = sample_points(commits.len());
    let last_point = points.last().copied();

    let mut samples = Vec::new();
    let mut content_taken = false;

    for index in points {
        let commit = &commits[index];
        let is_last_point = Some(index) == last_point;
        let wants_content = !content_taken || is_last_point;

        match sample_commit(history, commit, file, max_diff_lines, wants_content) {
            Ok(Some(record)) => {
                content_taken = true;
                samples.push(record);
            }
            Ok(None) => {}
            Err(e) => debug!("Skipping {} at {}: {}", file, commit.sha, e),
        }
    }

    Ok(samples)
}

/// One sample, or `None` when the diff is too large or empty once cleaned.
fn sample_commit(
    history: &GitHistory,
    commit: &FileCommit,
    file: &str,
    max_diff_lines: usize,
    with_content: bool,
) -> GitResult<Option<CommitRecord>> {
    let diff = history.file_diff(&commit.sha, file)?;
    let raw_lines = diff.lines().count();
    if raw_lines > max_diff_lines {
        debug!(
            "Diff of {} at {} has {} lines, skipping",
            file, commit.sha, raw_lines
        );
        return Ok(None);
    }

    let changes = clean_diff(&diff);
    if changes.trim().is_empty() {
        return Ok(None);
    }

    let content = if with_content {
        Some(history.file_content_at(&commit.sha, file)?).filter(|c| !c.is_empty())
    } else {
        None
    };

    Ok(Some(CommitRecord {
        sha: commit.sha.clone(),
        date: commit.date,
        file: file.to_string(),
        changes,
        content,
    }))
}

fn group_by_file(records: Vec<CommitRecord>) -> BTreeMap<String, Vec<CommitRecord>> {
    let mut by_file: BTreeMap<String, Vec<CommitRecord>> = BTreeMap::new();
    for record in records {
        by_file.entry(record.file.clone()).or_default().push(record);
    }
    by_file
}
