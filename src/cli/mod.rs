//! CLI command definitions and handlers

mod activity;
mod config;
mod select;
mod temporal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use codeprint::config::{load_config_file, load_project_config, ProjectConfig};
use codeprint::selection::SelectionMode;

/// codeprint - developer identity profiling from git history
#[derive(Parser, Debug)]
#[command(name = "codeprint")]
#[command(
    version,
    about = "Profile a developer from their repository checkouts: representative repositories, commit evolution and activity patterns",
    after_help = "\
Layout:
  {base}/{username}/report.json                 Contributor and commit feed
  {base}/{username}/{username}_{repo}.git/      One checkout per repository

Examples:
  codeprint select octocat                      Pick representative repositories
  codeprint select octocat --selector owner     Only repositories octocat owns alone
  codeprint activity octocat                    Commit timing patterns as JSON
  codeprint temporal octocat --sources structure.json --no-llm"
)]
pub struct Cli {
    /// Directory holding per-user checkouts and outputs
    #[arg(long, global = true, default_value = "out")]
    pub base_path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Project config file (default: codeprint.toml or .codeprintrc.json in the base path)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the repositories that best represent a developer
    Select {
        /// GitHub username
        username: String,

        /// Selection strategy: scored (top-scored plus sole-owner repos) or owner (sole-owner repos only)
        #[arg(long, default_value = "scored", value_parser = ["scored", "owner"])]
        selector: String,

        /// Maximum number of scored repositories (overrides config)
        #[arg(long)]
        max_repos: Option<usize>,
    },

    /// Print commit timing patterns for a developer's commit feed
    Activity {
        /// GitHub username
        username: String,
    },

    /// Sample core-file history and run the temporal analysis
    Temporal {
        /// GitHub username
        username: String,

        /// Repository structure JSON produced by the structure analysis
        #[arg(long)]
        sources: PathBuf,

        /// Skip the language model; only sample commits and compute activity
        #[arg(long)]
        no_llm: bool,
    },

    /// Manage user configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize the user config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Select {
            ref username,
            ref selector,
            max_repos,
        } => {
            let mut config = project_config(&cli)?;
            if let Some(max_repos) = max_repos {
                config.selection.max_repos = max_repos;
            }
            let mode = match selector.as_str() {
                "owner" => SelectionMode::OwnerOnly,
                _ => SelectionMode::Scored,
            };
            select::run(&cli.base_path, username, mode, config)
        }

        Commands::Activity { ref username } => activity::run(&cli.base_path, username),

        Commands::Temporal {
            ref username,
            ref sources,
            no_llm,
        } => {
            let config = project_config(&cli)?;
            temporal::run(&cli.base_path, username, sources, no_llm, &config)
        }

        Commands::Config { ref action } => match action {
            ConfigAction::Init => config::init(),
            ConfigAction::Show => config::show(&cli.base_path),
        },
    }
}

/// Explicit `--config` file, else whatever the base path holds.
fn project_config(cli: &Cli) -> Result<ProjectConfig> {
    match &cli.config {
        Some(path) => load_config_file(path),
        None => Ok(load_project_config(&cli.base_path)),
    }
}

/// Write a pretty-printed JSON output file.
fn write_output<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
