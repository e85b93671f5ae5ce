//! Temporal command - commit sampling and temporal analysis

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use codeprint::ai::{AiClient, JsonResponder};
use codeprint::config::{ProjectConfig, UserConfig};
use codeprint::models::{Report, UserWorkspace};
use codeprint::temporal::{analyze_temporal_patterns, RepositorySources, PATTERNS_FILE};

use super::{spinner, write_output};

pub fn run(
    base_path: &Path,
    username: &str,
    sources_path: &Path,
    no_llm: bool,
    config: &ProjectConfig,
) -> Result<()> {
    let workspace = UserWorkspace::new(base_path, username);
    let report = Report::load(&workspace.report_path())?;
    let sources = RepositorySources::load(sources_path)?;

    let client = if no_llm {
        None
    } else {
        let user_config = UserConfig::load()?;
        Some(
            AiClient::from_user_config(&user_config)
                .context("No LLM backend configured (run `codeprint config init`, or pass --no-llm)")?,
        )
    };
    let responder = client.as_ref().map(|c| c as &dyn JsonResponder);

    let pb = spinner("Sampling commit history...");
    let patterns = analyze_temporal_patterns(&sources, &report, responder, &workspace, config);
    pb.finish_and_clear();
    let patterns = patterns?;

    let output_path = workspace.user_path().join(PATTERNS_FILE);
    write_output(&output_path, &patterns)?;

    let failed = patterns
        .commit_style_metrics
        .values()
        .filter(|v| v.get("error").is_some())
        .count();
    println!("\n{}", style("Temporal Analysis").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    println!(
        "  Repositories analyzed: {}",
        patterns.commit_style_metrics.len() - failed
    );
    if failed > 0 {
        println!("  {} {} analyses failed", style("⚠").yellow(), failed);
    }
    println!(
        "  Commits per day:       {}",
        patterns.activity_patterns.frequency.commits_per_day
    );
    println!(
        "  Timezone hint:         {}",
        patterns.activity_patterns.frequency.timezone_hint
    );
    println!(
        "\n{} Wrote {}",
        style("✓").green(),
        style(output_path.display()).cyan()
    );
    Ok(())
}
