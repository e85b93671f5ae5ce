//! Repository scoring
//!
//! # Scoring Formula
//!
//! ```text
//! Total = Recency + Activity + Contribution
//!
//!   Recency      = max(0, 35 - days_since_last_commit / 30)        (0-35)
//!   Activity     = min(35, commit_count * 2 + commits_per_day * 10) (0-35)
//!   Contribution = min(30, files * 2 + avg_percentage / 5)         (0-30)
//!                  or, with no contribution files,
//!                  min(15, commit_count / 2)
//! ```
//!
//! Each component is capped on its own. Weights and caps come from
//! [`ScoringConfig`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::info;

use crate::config::ScoringConfig;
use crate::models::{ContributionFile, RepoStats, Repository};

/// Per-component score of one repository.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub recency: f64,
    pub activity: f64,
    pub contribution: f64,
    pub total: f64,
}

/// Score a repository as of `now`.
///
/// A last commit in the future counts as zero days old.
pub fn score_repository(
    stats: &RepoStats,
    contribution_files: &[ContributionFile],
    now: DateTime<Utc>,
    weights: &ScoringConfig,
) -> ScoreBreakdown {
    let days_since_last_commit = (now - stats.last_commit).num_days().max(0) as f64;
    let recency = (weights.recency_max - days_since_last_commit / weights.recency_decay_days).max(0.0);

    let activity = (stats.commit_count as f64 * weights.commit_weight
        + stats.commits_per_day * weights.cadence_weight)
        .min(weights.activity_max);

    let contribution = if contribution_files.is_empty() {
        (stats.commit_count as f64 / weights.fallback_divisor).min(weights.fallback_max)
    } else {
        let file_count = contribution_files.len() as f64;
        let avg_contribution = contribution_files
            .iter()
            .map(|f| f.contribution_percentage)
            .sum::<f64>()
            / file_count;
        (file_count * weights.file_weight + avg_contribution / weights.percentage_divisor)
            .min(weights.contribution_max)
    };

    ScoreBreakdown {
        recency,
        activity,
        contribution,
        total: recency + activity + contribution,
    }
}

/// Score every repository and keep the `max_repos` best.
///
/// The sort is stable, so ties keep their input order.
pub fn select_best_repositories(
    mut repositories: Vec<Repository>,
    max_repos: usize,
    now: DateTime<Utc>,
    weights: &ScoringConfig,
) -> Vec<Repository> {
    if repositories.is_empty() {
        return Vec::new();
    }

    for repo in &mut repositories {
        repo.analysis_score =
            score_repository(&repo.stats, &repo.contribution_files, now, weights).total;
    }

    repositories.sort_by(|a, b| {
        b.analysis_score
            .partial_cmp(&a.analysis_score)
            .unwrap_or(Ordering::Equal)
    });
    repositories.truncate(max_repos);

    info!("Selected {} repositories:", repositories.len());
    for repo in &repositories {
        info!("- {} (score: {:.2})", repo.name, repo.analysis_score);
    }

    repositories
}
