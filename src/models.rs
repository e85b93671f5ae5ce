//! Core data models for codeprint
//!
//! Input records (the contributor/commit report), per-repository metadata
//! produced by selection, and the commit samples produced by the temporal
//! pipeline.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk layout for one profiled user.
///
/// Checkouts follow `{base}/{username}/{username}_{repo}.git/`.
#[derive(Debug, Clone)]
pub struct UserWorkspace {
    pub base_path: PathBuf,
    pub username: String,
}

impl UserWorkspace {
    pub fn new(base_path: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            username: username.into(),
        }
    }

    /// Directory holding the user's checkouts, report and outputs.
    pub fn user_path(&self) -> PathBuf {
        self.base_path.join(&self.username)
    }

    /// Checkout directory for a repository name.
    pub fn checkout_path(&self, repo: &str) -> PathBuf {
        self.user_path()
            .join(format!("{}_{}.git", self.username, repo))
    }

    pub fn report_path(&self) -> PathBuf {
        self.user_path().join("report.json")
    }
}

/// Contributor and commit report for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub contributors: Vec<ContributorEntry>,
    #[serde(default)]
    pub commits: BTreeMap<String, Vec<FeedCommit>>,
}

/// Contributor list of one repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorEntry {
    pub repo: String,
    #[serde(default)]
    pub contributors: Vec<String>,
}

/// Commit record from the pre-fetched commit feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCommit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub commit: FeedCommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCommitDetail {
    pub author: FeedAuthor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedAuthor {
    /// ISO-8601 author date, e.g. `2024-03-01T09:15:00Z`
    pub date: String,
}

impl FeedCommit {
    /// Build a feed record from an author date string.
    pub fn at(date: impl Into<String>) -> Self {
        Self {
            sha: None,
            commit: FeedCommitDetail {
                author: FeedAuthor { date: date.into() },
            },
        }
    }

    /// Parsed author date, keeping the offset it was written with.
    pub fn author_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.commit.author.date).ok()
    }
}

impl Report {
    /// Load `report.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report {}", path.display()))
    }

    /// Feed commits for a repository (empty when the feed has none).
    pub fn repo_commits(&self, repo: &str) -> &[FeedCommit] {
        self.commits.get(repo).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Repositories whose only contributor is `username`.
    pub fn single_contributor_repos(&self, username: &str) -> Vec<String> {
        self.contributors
            .iter()
            .filter(|entry| entry.contributors.len() == 1 && entry.contributors[0] == username)
            .map(|entry| entry.repo.clone())
            .collect()
    }

    /// Every repository the user touched: listed as a contributor or
    /// present in the commit feed. Deduplicated, in name order.
    pub fn candidate_repos(&self, username: &str) -> Vec<String> {
        let mut names: BTreeSet<String> = self
            .contributors
            .iter()
            .filter(|entry| entry.contributors.iter().any(|c| c == username))
            .map(|entry| entry.repo.clone())
            .collect();
        names.extend(self.commits.keys().cloned());
        names.into_iter().collect()
    }

    /// Author dates of every feed commit across all repositories.
    ///
    /// Unparseable dates are skipped with a warning.
    pub fn commit_times(&self) -> Vec<DateTime<FixedOffset>> {
        let mut times = Vec::new();
        for (repo, commits) in &self.commits {
            for commit in commits {
                match commit.author_date() {
                    Some(date) => times.push(date),
                    None => warn!(
                        "Ignoring unparseable commit date {:?} in {}",
                        commit.commit.author.date, repo
                    ),
                }
            }
        }
        times
    }
}

/// Activity metrics of a repository's full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoStats {
    pub first_commit: DateTime<Utc>,
    pub last_commit: DateTime<Utc>,
    pub commit_count: usize,
    pub commits_per_day: f64,
    pub active_days: i64,
}

/// A file the target author wrote a meaningful share of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionFile {
    /// Path relative to the checkout root, `/`-separated
    pub path: String,
    /// Share of blamed lines attributed to the author (0-100)
    pub contribution_percentage: f64,
}

/// A scoring candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Repository {
    pub name: String,
    pub stats: RepoStats,
    pub contribution_files: Vec<ContributionFile>,
    pub analysis_score: f64,
}

/// Metadata attached to every selected repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub contribution_files: Vec<ContributionFile>,
    /// `None` when stats could not be computed
    pub stats: Option<RepoStats>,
    /// Present for repositories that went through scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_score: Option<f64>,
}

/// A repository dropped from scoring, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRepository {
    pub name: String,
    pub reason: String,
}

/// Outcome of a selection run.
///
/// Every name in `repositories` has an entry in `metadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Top-scored repositories by score, then the remaining
    /// single-contributor repositories by name
    pub repositories: Vec<String>,
    pub metadata: BTreeMap<String, RepoMetadata>,
    #[serde(default)]
    pub skipped: Vec<SkippedRepository>,
}

impl SelectionResult {
    pub fn contains(&self, repo: &str) -> bool {
        self.repositories.iter().any(|r| r == repo)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

/// One sampled commit of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub date: DateTime<FixedOffset>,
    pub file: String,
    /// Cleaned diff of this file in this commit
    pub changes: String,
    /// Full file content, only on the first and last sample of a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Sampled evolution of a repository's core files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoEvolution {
    pub core_files: Vec<String>,
    pub evolution: Evolution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    pub commit_count: usize,
    pub commits_by_file: BTreeMap<String, Vec<CommitRecord>>,
}
