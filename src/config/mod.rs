//! Configuration module for codeprint
//!
//! This module handles:
//! - Project-level tuning (codeprint.toml): selection limits, scoring
//!   weights, sampling bounds, excluded directories, extensions
//! - User-level LLM settings (~/.config/codeprint/config.toml)

mod project_config;
mod user_config;

pub use project_config::{
    load_config_file, load_project_config, ExcludeConfig, ExtensionConfig, ProjectConfig,
    SamplingConfig, ScoringConfig, SelectionConfig, TemporalConfig, DEFAULT_EXCLUDED_DIRS,
    DEFAULT_MAX_DIFF_LINES, DEFAULT_MAX_REPOS, DEFAULT_MIN_CONTRIBUTION_PERCENTAGE,
    DEFAULT_MIN_FEED_COMMITS, DEFAULT_MIN_FILE_COUNT, RELEVANT_EXTENSIONS,
};
pub use user_config::{AiSettings, UserConfig};
