//! LLM access for the qualitative analyses
//!
//! The profiler only needs one thing from a language model: turn a prompt
//! into a JSON document. [`JsonResponder`] is that seam; [`AiClient`] is
//! the HTTP implementation (BYOK, keys read from the environment or user
//! config).
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: Required for the Anthropic backend
//! - `OPENAI_API_KEY`: Required for the OpenAI backend
//! - `OLLAMA_MODEL`: Optional model for the local Ollama backend

mod client;

pub use client::{extract_json, AiClient, LlmBackend};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

pub type AiResult<T> = Result<T, AiError>;

/// Turns a prompt into a structured JSON answer.
///
/// `Ok(None)` means the model answered but not with usable JSON.
pub trait JsonResponder {
    fn generate_json_response(&self, prompt: &str) -> AiResult<Option<serde_json::Value>>;
}
