//! Temporal analysis
//!
//! Two views of how a developer works over time:
//!
//! - Commit samples of the core files of well-established repositories,
//!   handed to a language model for a qualitative evolution analysis
//! - Statistical activity patterns over every commit in the feed
//!   ([`activity::activity_patterns`])
//!
//! # Pipeline
//!
//! 1. Pick target repositories with enough history ([`select_temporal_targets`])
//! 2. Sample their core files ([`collect_commit_contents`])
//! 3. Write the inspection artifact and ask the model about each target
//! 4. Attach activity patterns computed from the feed

pub mod activity;
pub mod sampler;

pub use activity::{activity_patterns, ActivityPatterns};
pub use sampler::{sample_commits, sample_file, sample_points, sample_repository};

use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::JsonResponder;
use crate::config::ProjectConfig;
use crate::models::{RepoEvolution, Report, UserWorkspace};

/// File name of the sampled-commit inspection artifact.
pub const INSPECTION_FILE: &str = "temporal_analysis_contents.json";
/// File name of the temporal analysis result.
pub const PATTERNS_FILE: &str = "temporal_patterns.json";

#[derive(Error, Debug)]
pub enum TemporalError {
    #[error("could not determine username from repository structure")]
    UnknownUsername,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize temporal data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TemporalResult<T> = Result<T, TemporalError>;

/// Output of the repository-structure analysis this stage builds on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySources {
    #[serde(default)]
    pub stylometry_repo_structure: BTreeMap<String, RepoSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSource {
    #[serde(default)]
    pub structure: RepoStructure,
    #[serde(default)]
    pub file_stats: FileStats,
    #[serde(default)]
    pub samples: RepoSamples,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoStructure {
    /// Checkout directory name, `{username}_{repo}.git`
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileStats {
    #[serde(default)]
    pub file_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSamples {
    /// Core file path to its sample payload
    #[serde(default)]
    pub core_files: BTreeMap<String, Value>,
}

impl RepositorySources {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sources {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sources {}", path.display()))
    }

    /// Username encoded in the first checkout name (`{username}_{repo}.git`).
    pub fn username(&self) -> TemporalResult<String> {
        self.stylometry_repo_structure
            .values()
            .map(|repo| repo.structure.name.as_str())
            .find(|name| !name.is_empty())
            .and_then(|name| name.split('_').next())
            .filter(|user| !user.is_empty())
            .map(str::to_string)
            .ok_or(TemporalError::UnknownUsername)
    }
}

/// What was sampled, written out for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalInspection {
    pub temporal_targets: Vec<String>,
    pub commit_contents: BTreeMap<String, RepoEvolution>,
}

/// Result of the temporal analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalPatterns {
    /// Model analysis per repository; failures are stored as `{"error": msg}`
    pub commit_style_metrics: BTreeMap<String, Value>,
    pub activity_patterns: ActivityPatterns,
}

/// Repositories with enough history for commit sampling.
pub fn select_temporal_targets(
    sources: &RepositorySources,
    report: &Report,
    config: &ProjectConfig,
) -> Vec<String> {
    sources
        .stylometry_repo_structure
        .iter()
        .filter(|(name, repo)| {
            report.repo_commits(name).len() >= config.temporal.min_feed_commits
                && repo.file_stats.file_count >= config.temporal.min_file_count
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// Sample the core files of each target repository.
///
/// Targets without a checkout name, without core files or without any
/// usable commit are left out. Fails only when no username can be derived
/// from the sources.
pub fn collect_commit_contents(
    targets: &[String],
    sources: &RepositorySources,
    base_path: &Path,
    max_diff_lines: usize,
) -> TemporalResult<BTreeMap<String, RepoEvolution>> {
    let username = sources.username()?;
    let user_path = UserWorkspace::new(base_path, &username).user_path();

    let contents: Vec<(String, RepoEvolution)> = targets
        .par_iter()
        .filter_map(|name| {
            let source = sources.stylometry_repo_structure.get(name)?;
            if source.structure.name.is_empty() {
                warn!("No checkout name for repository {}", name);
                return None;
            }

            let core_files: Vec<String> = source.samples.core_files.keys().cloned().collect();
            if core_files.is_empty() {
                return None;
            }

            let repo_path = user_path.join(&source.structure.name);
            sampler::sample_repository(&repo_path, &core_files, max_diff_lines)
                .map(|evolution| (name.clone(), evolution))
        })
        .collect();

    Ok(contents.into_iter().collect())
}

/// Prompt asking for the evolution analysis of one repository.
pub fn temporal_prompt(repo_name: &str, evolution: &RepoEvolution) -> TemporalResult<String> {
    let evolution_json = serde_json::to_string_pretty(evolution)?;
    Ok(format!(
        r#"TEMPORAL ANALYSIS

Analyze how this codebase evolved over time, focusing on the developer's behavior and on how the code changed.

Repository: {repo_name}

Code evolution data:
{evolution_json}

Answer with JSON of this shape:
{{
  "evolution_patterns": {{
    "code_quality": {{
      "progression": string,
      "refactoring_patterns": [{{"pattern": string, "frequency": string, "motivation": string}}],
      "complexity_trends": {{"direction": string, "significant_changes": [string], "trigger_patterns": [string]}}
    }},
    "development_cycles": {{
      "commit_patterns": {{
        "frequency": {{
          "pattern": string,
          "active_hours": [string],
          "timezone_confidence": {{"zone": string, "confidence": number, "evidence": [string]}}
        }},
        "burst_patterns": [{{"pattern": string, "typical_duration": string, "characteristics": [string]}}]
      }},
      "feature_development": {{"typical_cycle": string, "iteration_patterns": [string], "testing_integration": string}}
    }},
    "communication_patterns": {{
      "pr_characteristics": {{"detail_level": string, "discussion_style": string, "iteration_patterns": string}},
      "documentation_evolution": {{"frequency": string, "detail_trends": string, "update_patterns": string}}
    }}
  }},
  "architectural_evolution": {{
    "major_changes": [{{"change": string, "motivation": string, "impact": string}}],
    "improvement_patterns": {{"refactoring_types": [string], "optimization_focus": [string], "maintenance_patterns": string}},
    "technical_debt": {{"accumulation_patterns": [string], "resolution_approaches": string, "prevention_strategies": string}}
  }}
}}

Focus on:
1. Developer behavior patterns
2. How the coding style evolved
3. Timezone evidence
4. Burst activity
5. Code quality progression
"#
    ))
}

/// Run the full temporal analysis.
///
/// Checkouts are found under the username the sources encode; the
/// inspection artifact goes to `workspace`'s user directory, next to the
/// other outputs of that user. Passing no responder skips the model step
/// and leaves `commit_style_metrics` empty.
pub fn analyze_temporal_patterns(
    sources: &RepositorySources,
    report: &Report,
    responder: Option<&dyn JsonResponder>,
    workspace: &UserWorkspace,
    config: &ProjectConfig,
) -> TemporalResult<TemporalPatterns> {
    let targets = select_temporal_targets(sources, report, config);
    info!("Selected {} temporal targets", targets.len());

    let sources_username = sources.username()?;
    if sources_username != workspace.username {
        warn!(
            "Checkouts belong to {} but outputs are written for {}",
            sources_username, workspace.username
        );
    }

    let commit_contents = collect_commit_contents(
        &targets,
        sources,
        &workspace.base_path,
        config.sampling.max_diff_lines,
    )?;

    let inspection_path = workspace.user_path().join(INSPECTION_FILE);
    let inspection = TemporalInspection {
        temporal_targets: targets,
        commit_contents,
    };
    match write_json(&inspection_path, &inspection) {
        Ok(()) => info!("Saved temporal analysis data to {}", inspection_path.display()),
        Err(e) => warn!("Error saving inspection data: {}", e),
    }

    let mut commit_style_metrics = BTreeMap::new();
    if let Some(responder) = responder {
        for name in &inspection.temporal_targets {
            let Some(evolution) = inspection.commit_contents.get(name) else {
                continue;
            };

            info!("Analyzing temporal patterns for repository: {}", name);
            let prompt = temporal_prompt(name, evolution)?;
            match responder.generate_json_response(&prompt) {
                Ok(Some(result)) => {
                    commit_style_metrics.insert(name.clone(), result);
                }
                Ok(None) => warn!("No usable answer for {}", name),
                Err(e) => {
                    warn!("Temporal analysis failed for {}: {}", name, e);
                    commit_style_metrics.insert(name.clone(), json!({ "error": e.to_string() }));
                }
            }
        }
    }

    Ok(TemporalPatterns {
        commit_style_metrics,
        activity_patterns: activity_patterns(report.commit_times()),
    })
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> TemporalResult<()> {
    let io_err = |source| TemporalError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(io_err)
}
