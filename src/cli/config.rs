//! Config command - user configuration

use anyhow::Result;
use console::style;
use std::path::Path;

use codeprint::config::UserConfig;

pub fn init() -> Result<()> {
    let path = UserConfig::init_user_config()?;
    println!("{} Config initialized at: {}", style("✓").green(), path.display());
    println!("\nEdit to add your API key:");
    println!("  {}", path.display());
    println!("\nOr set via environment:");
    println!("  export ANTHROPIC_API_KEY=\"sk-ant-...\"");
    Ok(())
}

pub fn show(base_path: &Path) -> Result<()> {
    let config = UserConfig::load()?;

    println!("Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        println!("  User:    {} {}", user_path.display(), found(&user_path));
    }
    for name in ["codeprint.toml", ".codeprintrc.json"] {
        let project_path = base_path.join(name);
        println!("  Project: {} {}", project_path.display(), found(&project_path));
    }

    let backend = config.backend();
    println!();
    println!("AI backend: {:?}", backend);
    println!("  Model: {}", config.model().as_deref().unwrap_or(backend.default_model()));
    if backend.requires_api_key() {
        let key_status = if config.api_key().is_some() {
            style("✓ configured").green()
        } else {
            style("✗ not set").red()
        };
        println!("  {}: {}", backend.env_key(), key_status);
    }
    Ok(())
}

fn found(path: &Path) -> console::StyledObject<&'static str> {
    if path.exists() {
        style("✓").green()
    } else {
        style("(not found)").dim()
    }
}
