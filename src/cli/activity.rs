//! Activity command - commit timing patterns

use anyhow::Result;
use std::path::Path;

use codeprint::models::{Report, UserWorkspace};
use codeprint::temporal::activity_patterns;

pub fn run(base_path: &Path, username: &str) -> Result<()> {
    let workspace = UserWorkspace::new(base_path, username);
    let report = Report::load(&workspace.report_path())?;

    let patterns = activity_patterns(report.commit_times());
    println!("{}", serde_json::to_string_pretty(&patterns)?);
    Ok(())
}
