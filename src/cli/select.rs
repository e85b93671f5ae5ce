//! Select command - pick representative repositories

use anyhow::Result;
use console::style;
use std::path::Path;

use codeprint::config::ProjectConfig;
use codeprint::models::{Report, UserWorkspace};
use codeprint::selection::{RepositorySelector, SelectionMode};

use super::{spinner, write_output};

/// File name of the selection result.
pub const SELECTION_FILE: &str = "repository_selection.json";

pub fn run(base_path: &Path, username: &str, mode: SelectionMode, config: ProjectConfig) -> Result<()> {
    let workspace = UserWorkspace::new(base_path, username);
    let report = Report::load(&workspace.report_path())?;

    let pb = spinner(format!("Selecting repositories for {}...", username));
    let selector = RepositorySelector::new(workspace.clone(), config);
    let result = selector.select_repositories(&report, mode);
    pb.finish_and_clear();

    let output_path = workspace.user_path().join(SELECTION_FILE);
    write_output(&output_path, &result)?;

    println!("\n{}", style("Repository Selection").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    for name in &result.repositories {
        let Some(meta) = result.metadata.get(name) else {
            continue;
        };
        let score = match meta.analysis_score {
            Some(score) => format!("{:.2}", score),
            None => "sole contributor".to_string(),
        };
        println!(
            "  {} {}  {} files  {}",
            style("•").cyan(),
            style(name).bold(),
            meta.contribution_files.len(),
            style(score).dim()
        );
    }

    if !result.skipped.is_empty() {
        println!(
            "\n{} {} repositories skipped",
            style("⚠").yellow(),
            result.skipped.len()
        );
        for skipped in &result.skipped {
            println!("  {} {}", style(&skipped.name).dim(), style(&skipped.reason).dim());
        }
    }

    println!(
        "\n{} Selected {} repositories, wrote {}",
        style("✓").green(),
        result.len(),
        style(output_path.display()).cyan()
    );
    Ok(())
}
