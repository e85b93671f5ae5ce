//! User-level configuration for codeprint
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/codeprint/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::LlmBackend;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiSettings,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AiSettings {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Model override (backend default otherwise)
    pub model: Option<String>,

    /// AI backend: "anthropic" (default), "openai", "ollama"
    pub backend: Option<String>,

    /// Ollama model (default: backend default)
    pub ollama_model: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/codeprint/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(user_config) = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<UserConfig>(&content).ok())
        {
            config.merge(user_config);
        }

        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.ai.anthropic_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.ai.openai_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.ai.ollama_model = Some(model);
        }

        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codeprint").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.ai.anthropic_api_key.is_some() {
            self.ai.anthropic_api_key = other.ai.anthropic_api_key;
        }
        if other.ai.openai_api_key.is_some() {
            self.ai.openai_api_key = other.ai.openai_api_key;
        }
        if other.ai.model.is_some() {
            self.ai.model = other.ai.model;
        }
        if other.ai.backend.is_some() {
            self.ai.backend = other.ai.backend;
        }
        if other.ai.ollama_model.is_some() {
            self.ai.ollama_model = other.ai.ollama_model;
        }
    }

    /// Configured backend; unknown names fall back to Anthropic.
    pub fn backend(&self) -> LlmBackend {
        match self.ai.backend.as_deref() {
            Some("openai") => LlmBackend::OpenAi,
            Some("ollama") => LlmBackend::Ollama,
            _ => LlmBackend::Anthropic,
        }
    }

    /// API key for the configured backend, if any.
    pub fn api_key(&self) -> Option<&str> {
        match self.backend() {
            LlmBackend::Anthropic => self.ai.anthropic_api_key.as_deref(),
            LlmBackend::OpenAi => self.ai.openai_api_key.as_deref(),
            LlmBackend::Ollama => Some("ollama"),
        }
    }

    /// Model to request: explicit override, then Ollama model, then the
    /// backend default.
    pub fn model(&self) -> Option<String> {
        self.ai.model.clone().or_else(|| match self.backend() {
            LlmBackend::Ollama => self.ai.ollama_model.clone(),
            _ => None,
        })
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# codeprint User Configuration

[ai]
# Backend: "anthropic" (needs API key), "openai" (needs API key) or "ollama" (local)
# backend = "anthropic"

# anthropic_api_key = "sk-ant-..."
# openai_api_key = "sk-..."

# model = "claude-sonnet-4-20250514"
# ollama_model = "qwen2.5-coder"
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}
