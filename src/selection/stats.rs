//! Repository activity profiling
//!
//! Merges the checkout's own commit timestamps with the pre-fetched commit
//! feed and derives span and cadence. The pool is not deduplicated: a
//! commit present in both sources counts twice.

use chrono::{TimeZone, Utc};
use std::path::Path;
use tracing::warn;

use crate::git::{GitHistory, GitResult};
use crate::models::{FeedCommit, RepoStats};

/// Activity metrics for the checkout at `repo_path`.
///
/// Fails when the local history cannot be read (not a checkout, empty
/// repository); the caller then leaves the repository out of scoring.
/// `Ok(None)` means there were no timestamps at all.
pub fn repository_stats(repo_path: &Path, feed: &[FeedCommit]) -> GitResult<Option<RepoStats>> {
    let history = GitHistory::open(repo_path)?;
    let mut timestamps = history.commit_timestamps()?;

    for commit in feed {
        match commit.author_date() {
            Some(date) => timestamps.push(date.timestamp()),
            None => warn!(
                "Ignoring unparseable feed date {:?} for {}",
                commit.commit.author.date,
                repo_path.display()
            ),
        }
    }

    Ok(stats_from_timestamps(&timestamps))
}

/// Derive stats from a timestamp pool (seconds since epoch).
///
/// `active_days` is the whole-day span between first and last commit,
/// inclusive, so it is at least 1.
pub fn stats_from_timestamps(timestamps: &[i64]) -> Option<RepoStats> {
    let first = *timestamps.iter().min()?;
    let last = *timestamps.iter().max()?;

    let first_commit = Utc.timestamp_opt(first, 0).single()?;
    let last_commit = Utc.timestamp_opt(last, 0).single()?;
    let commit_count = timestamps.len();
    let active_days = (last_commit - first_commit).num_days() + 1;

    Some(RepoStats {
        first_commit,
        last_commit,
        commit_count,
        commits_per_day: commit_count as f64 / active_days.max(1) as f64,
        active_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::{commit_files, init_repo};
    use anyhow::Result;
    use tempfile::tempdir;

    const DAY: i64 = 86_400;

    #[test]
    fn test_stats_from_timestamps() {
        let base = 1_700_000_000;
        let stats = stats_from_timestamps(&[base + 3 * DAY, base, base + DAY + 10]).unwrap();
        assert_eq!(stats.commit_count, 3);
        assert_eq!(stats.active_days, 4);
        assert!((stats.commits_per_day - 0.75).abs() < 1e-9);
        assert_eq!(stats.first_commit.timestamp(), base);
        assert_eq!(stats.last_commit.timestamp(), base + 3 * DAY);
    }

    #[test]
    fn test_same_day_is_one_active_day() {
        let stats = stats_from_timestamps(&[100, 200, 300]).unwrap();
        assert_eq!(stats.active_days, 1);
        assert!((stats.commits_per_day - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_timestamps() {
        assert!(stats_from_timestamps(&[]).is_none());
    }

    #[test]
    fn test_merges_local_history_and_feed() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        commit_files(&repo, &[("a.py", "1\n")], "octo", 1_700_000_000, "one")?;
        commit_files(&repo, &[("a.py", "2\n")], "hubot", 1_700_000_000 + DAY, "two")?;

        let feed = vec![
            FeedCommit::at("2023-11-24T22:13:20Z"),
            FeedCommit::at("garbage"),
        ];
        let stats = repository_stats(dir.path(), &feed)?.expect("stats");
        assert_eq!(stats.commit_count, 3);
        assert_eq!(stats.first_commit.timestamp(), 1_700_000_000);
        assert_eq!(stats.last_commit.timestamp(), 1_700_864_000);
        assert_eq!(stats.active_days, 11);
        Ok(())
    }

    #[test]
    fn test_not_a_checkout_fails() -> Result<()> {
        let dir = tempdir()?;
        assert!(repository_stats(dir.path(), &[]).is_err());
        Ok(())
    }
}
