//! Project-level configuration support
//!
//! Loads tuning knobs from `codeprint.toml` or `.codeprintrc.json` in the
//! base path. Every knob has a named default, so an absent file means the
//! stock behavior.
//!
//! # Configuration Format
//!
//! ```toml
//! # codeprint.toml
//!
//! [selection]
//! max_repos = 15
//! min_contribution_percentage = 20.0
//!
//! [scoring]
//! recency_max = 35.0
//! recency_decay_days = 30.0
//!
//! [sampling]
//! max_diff_lines = 100
//!
//! [exclude]
//! dirs = ["generated"]
//!
//! [extensions]
//! extra = ["vue", "svelte"]
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Number of top-scored repositories kept.
pub const DEFAULT_MAX_REPOS: usize = 15;
/// Minimum share of a file's lines the author must own.
pub const DEFAULT_MIN_CONTRIBUTION_PERCENTAGE: f64 = 20.0;
/// Commits whose raw diff exceeds this many lines are not sampled.
pub const DEFAULT_MAX_DIFF_LINES: usize = 100;
/// Feed commits a repository needs before its history is sampled.
pub const DEFAULT_MIN_FEED_COMMITS: usize = 5;
/// Files a repository needs before its history is sampled.
pub const DEFAULT_MIN_FILE_COUNT: usize = 10;

/// Directory names never walked for contribution files.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    "build",
    "dist",
    ".git",
    "vendor",
    "third_party",
    "external",
];

/// Recognized source extensions (lowercase, without the dot).
pub const RELEVANT_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "java", "cpp", "c", "h", "hpp", "rb", "php", "go", "rs",
    "swift", "kt", "kts", "scala", "pl", "pm", "r", "sh", "bat", "ps1", "lua", "sql", "html",
    "css", "xml", "json", "yaml", "yml", "md", "ipynb", "m", "mm", "vb", "cs", "fs", "fsx", "erl",
    "hrl", "ex", "exs", "dart", "groovy", "jl", "clj", "cljs", "coffee", "litcoffee", "rkt", "hs",
    "lhs", "ml", "mli", "nim", "cr", "nimble", "hx", "hxsl", "hxproj", "hxcpp", "hxcs", "hxjava",
    "hxnode", "hxphp", "hxpy", "hxrb", "hxswf", "hxvm", "hxweb", "hxwin", "hxwpf", "sol", "vy",
];

/// Project-level configuration loaded from codeprint.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub temporal: TemporalConfig,

    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub extensions: ExtensionConfig,
}

/// Repository selection limits
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,

    #[serde(default = "default_min_contribution_percentage")]
    pub min_contribution_percentage: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_repos: default_max_repos(),
            min_contribution_percentage: default_min_contribution_percentage(),
        }
    }
}

fn default_max_repos() -> usize {
    DEFAULT_MAX_REPOS
}
fn default_min_contribution_percentage() -> f64 {
    DEFAULT_MIN_CONTRIBUTION_PERCENTAGE
}

/// Weights of the repository score.
///
/// ```text
/// recency      = max(0, recency_max - days_since_last_commit / recency_decay_days)
/// activity     = min(activity_max, commits * commit_weight + commits_per_day * cadence_weight)
/// contribution = min(contribution_max, files * file_weight + avg_pct / percentage_divisor)
///             or min(fallback_max, commits / fallback_divisor) without contribution files
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub recency_max: f64,
    pub recency_decay_days: f64,
    pub activity_max: f64,
    pub commit_weight: f64,
    pub cadence_weight: f64,
    pub contribution_max: f64,
    pub file_weight: f64,
    pub percentage_divisor: f64,
    pub fallback_max: f64,
    pub fallback_divisor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recency_max: 35.0,
            recency_decay_days: 30.0,
            activity_max: 35.0,
            commit_weight: 2.0,
            cadence_weight: 10.0,
            contribution_max: 30.0,
            file_weight: 2.0,
            percentage_divisor: 5.0,
            fallback_max: 15.0,
            fallback_divisor: 2.0,
        }
    }
}

/// Commit sampling bounds
#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_diff_lines: default_max_diff_lines(),
        }
    }
}

fn default_max_diff_lines() -> usize {
    DEFAULT_MAX_DIFF_LINES
}

/// Which repositories get their history sampled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    pub min_feed_commits: usize,
    pub min_file_count: usize,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            min_feed_commits: DEFAULT_MIN_FEED_COMMITS,
            min_file_count: DEFAULT_MIN_FILE_COUNT,
        }
    }
}

/// Directory exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Extra directory names to skip
    #[serde(default)]
    pub dirs: Vec<String>,

    /// If true, disable the built-in excluded directories
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective excluded directory names (defaults + user entries).
    pub fn effective_dirs(&self) -> Vec<String> {
        let mut dirs = Vec::new();

        if !self.skip_defaults {
            dirs.extend(DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()));
        }

        for d in &self.dirs {
            if !dirs.contains(d) {
                dirs.push(d.clone());
            }
        }

        dirs
    }
}

/// Additional recognized source extensions
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtensionConfig {
    #[serde(default)]
    pub extra: Vec<String>,
}

impl ExtensionConfig {
    /// Whether a (case-insensitive, dot-less) extension counts as source.
    pub fn is_recognized(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        RELEVANT_EXTENSIONS.contains(&ext.as_str())
            || self
                .extra
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

/// Load project configuration from `dir`.
///
/// Searches for configuration files in this order:
/// 1. `codeprint.toml`
/// 2. `.codeprintrc.json`
///
/// Returns default configuration if no config file is found or the file
/// cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in ["codeprint.toml", ".codeprintrc.json"] {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from an explicit file; format follows the extension.
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(config)
}
