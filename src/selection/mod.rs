//! Repository selection
//!
//! Picks the repositories worth profiling for one user:
//!
//! 1. Every repository the user touched (contributor list or commit feed)
//!    is profiled: activity stats plus blame-based contribution files.
//! 2. Profiled repositories are scored ([`scoring`]) and the top
//!    `max_repos` kept.
//! 3. Repositories where the user is the only contributor are always added,
//!    whatever their score.
//!
//! The run returns a [`SelectionResult`]; nothing is kept on the selector.

pub mod contribution;
pub mod scoring;
pub mod stats;

pub use contribution::{collect_candidate_files, select_contribution_files};
pub use scoring::{score_repository, select_best_repositories, ScoreBreakdown};
pub use stats::{repository_stats, stats_from_timestamps};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::models::{
    RepoMetadata, Report, Repository, SelectionResult, SkippedRepository, UserWorkspace,
};

/// Which repositories a selection run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Top-scored repositories plus single-contributor repositories
    #[default]
    Scored,
    /// Single-contributor repositories only
    OwnerOnly,
}

/// Outcome of profiling one candidate repository.
enum Profiled {
    Candidate(Repository),
    Skipped(SkippedRepository),
}

/// Repository selector for one user workspace.
pub struct RepositorySelector {
    workspace: UserWorkspace,
    config: ProjectConfig,
}

impl RepositorySelector {
    pub fn new(workspace: UserWorkspace, config: ProjectConfig) -> Self {
        Self { workspace, config }
    }

    /// Run a selection as of now.
    pub fn select_repositories(&self, report: &Report, mode: SelectionMode) -> SelectionResult {
        self.select_repositories_at(report, mode, Utc::now())
    }

    /// Run a selection with recency measured against `now`.
    pub fn select_repositories_at(
        &self,
        report: &Report,
        mode: SelectionMode,
        now: DateTime<Utc>,
    ) -> SelectionResult {
        let username = &self.workspace.username;
        let mut result = SelectionResult::default();

        if mode == SelectionMode::Scored {
            let (repositories, skipped) = self.analyze_repositories(report);
            info!("Found {} repositories with activity", repositories.len());
            result.skipped = skipped;

            let selected = select_best_repositories(
                repositories,
                self.config.selection.max_repos,
                now,
                &self.config.scoring,
            );
            for repo in selected {
                result.repositories.push(repo.name.clone());
                result.metadata.insert(
                    repo.name,
                    RepoMetadata {
                        contribution_files: repo.contribution_files,
                        stats: Some(repo.stats),
                        analysis_score: Some(repo.analysis_score),
                    },
                );
            }
        }

        let scored_count = result.repositories.len();
        let mut owner_only = report.single_contributor_repos(username);
        owner_only.sort();
        owner_only.dedup();

        for name in owner_only {
            if result.contains(&name) {
                continue;
            }
            let metadata = self.repository_metadata(&name, report);
            result.metadata.insert(name.clone(), metadata);
            result.repositories.push(name);
        }

        info!(
            "Added {} single-contributor repositories",
            result.repositories.len() - scored_count
        );
        info!("Total repositories to analyze: {}", result.repositories.len());

        result
    }

    /// Profile every candidate repository.
    ///
    /// Candidates are processed in parallel; the output keeps candidate
    /// (name) order. Repositories whose checkout is missing or whose history
    /// cannot be read are reported as skipped.
    pub fn analyze_repositories(
        &self,
        report: &Report,
    ) -> (Vec<Repository>, Vec<SkippedRepository>) {
        let candidates = report.candidate_repos(&self.workspace.username);
        info!("Analyzing {} repositories...", candidates.len());

        let profiled: Vec<Profiled> = candidates
            .par_iter()
            .map(|name| self.profile_repository(name, report))
            .collect();

        let mut repositories = Vec::new();
        let mut skipped = Vec::new();
        for outcome in profiled {
            match outcome {
                Profiled::Candidate(repo) => repositories.push(repo),
                Profiled::Skipped(skip) => skipped.push(skip),
            }
        }
        (repositories, skipped)
    }

    fn profile_repository(&self, name: &str, report: &Report) -> Profiled {
        let skip = |reason: String| {
            debug!("Skipping {}: {}", name, reason);
            Profiled::Skipped(SkippedRepository {
                name: name.to_string(),
                reason,
            })
        };

        let repo_path = self.workspace.checkout_path(name);
        if !repo_path.exists() {
            return skip(format!("checkout not found at {}", repo_path.display()));
        }

        let stats = match repository_stats(&repo_path, report.repo_commits(name)) {
            Ok(Some(stats)) => stats,
            Ok(None) => return skip("no commits".to_string()),
            Err(e) => return skip(e.to_string()),
        };

        let contribution_files =
            select_contribution_files(&repo_path, &self.workspace.username, &self.config);

        if stats.commit_count == 0 && contribution_files.is_empty() {
            return skip("no activity".to_string());
        }

        Profiled::Candidate(Repository {
            name: name.to_string(),
            stats,
            contribution_files,
            analysis_score: 0.0,
        })
    }

    /// Stats and contribution files for one repository, computed on demand.
    ///
    /// Never fails: a missing checkout or unreadable history leaves the
    /// corresponding fields empty.
    pub fn repository_metadata(&self, name: &str, report: &Report) -> RepoMetadata {
        let repo_path = self.workspace.checkout_path(name);
        if !repo_path.exists() {
            debug!("No checkout for {}, metadata left empty", name);
            return RepoMetadata::default();
        }

        let stats = repository_stats(&repo_path, report.repo_commits(name))
            .unwrap_or_else(|e| {
                debug!("Stats unavailable for {}: {}", name, e);
                None
            });

        RepoMetadata {
            contribution_files: select_contribution_files(
                &repo_path,
                &self.workspace.username,
                &self.config,
            ),
            stats,
            analysis_score: None,
        }
    }
}
