//! Single-turn JSON client for Anthropic, OpenAI and Ollama
//!
//! Each call sends one system prompt and one user prompt and reads back one
//! text answer. Ollama is reached through its OpenAI-compatible endpoint.

use crate::ai::{AiError, AiResult, JsonResponder};
use crate::config::UserConfig;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an expert in developer profiling and code analysis. \
Answer with a single valid JSON document and nothing else.";

const MAX_TOKENS: u32 = 8192;
const TEMPERATURE: f32 = 0.2;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    Anthropic,
    OpenAi,
    Ollama,
}

impl LlmBackend {
    /// Environment variable the backend is configured through.
    pub fn env_key(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://console.anthropic.com/settings/keys",
            LlmBackend::OpenAi => "https://platform.openai.com/api-keys",
            LlmBackend::Ollama => "https://ollama.ai (no key needed, just run locally)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            LlmBackend::OpenAi => "gpt-4o",
            LlmBackend::Ollama => "qwen2.5-coder:7b",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }

    fn endpoint(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://api.anthropic.com/v1/messages",
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }
}

/// Prompt-in, JSON-out client over sync HTTP (ureq).
pub struct AiClient {
    backend: LlmBackend,
    model: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl AiClient {
    /// Fails with [`AiError::MissingApiKey`] when the backend needs a key
    /// and none is given. `model` falls back to the backend default.
    pub fn new(
        backend: LlmBackend,
        model: Option<String>,
        api_key: Option<String>,
    ) -> AiResult<Self> {
        let api_key = if backend.requires_api_key() {
            let key = api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                AiError::MissingApiKey {
                    env_var: backend.env_key().to_string(),
                    signup_url: backend.signup_url().to_string(),
                }
            })?;
            Some(key)
        } else {
            None
        };

        // Status codes are turned into AiError::ApiError by `complete`.
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(300)))
            .build()
            .new_agent();

        Ok(Self {
            backend,
            model: model.unwrap_or_else(|| backend.default_model().to_string()),
            api_key,
            agent,
        })
    }

    /// Client for the backend chosen in the merged user config.
    pub fn from_user_config(user: &UserConfig) -> AiResult<Self> {
        Self::new(
            user.backend(),
            user.model(),
            user.api_key().map(str::to_string),
        )
    }

    pub fn backend(&self) -> LlmBackend {
        self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request body for one prompt in the backend's wire format.
    fn request_body(&self, prompt: &str) -> Value {
        match self.backend {
            LlmBackend::Anthropic => json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
                "system": SYSTEM_PROMPT,
                "messages": [{"role": "user", "content": prompt}],
            }),
            LlmBackend::OpenAi | LlmBackend::Ollama => json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": prompt},
                ],
            }),
        }
    }

    /// Send one prompt and return the answer text.
    fn complete(&self, prompt: &str) -> AiResult<String> {
        let mut request = self
            .agent
            .post(self.backend.endpoint())
            .header("content-type", "application/json");

        if let Some(key) = &self.api_key {
            request = match self.backend {
                LlmBackend::Anthropic => request
                    .header("x-api-key", key)
                    .header("anthropic-version", ANTHROPIC_VERSION),
                _ => request.header("authorization", &format!("Bearer {key}")),
            };
        }

        debug!("Requesting {} from {:?}", self.model, self.backend);
        let response = request
            .send_json(self.request_body(prompt))
            .map_err(|e| AiError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            return Err(AiError::ApiError {
                status,
                message: body.read_to_string().unwrap_or_default(),
            });
        }

        let payload: Value = body
            .read_json()
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        answer_text(self.backend, &payload)
            .ok_or_else(|| AiError::ParseError("No text in model response".to_string()))
    }
}

impl JsonResponder for AiClient {
    fn generate_json_response(&self, prompt: &str) -> AiResult<Option<Value>> {
        let text = self.complete(prompt)?;
        let parsed = extract_json(&text);
        if parsed.is_none() {
            debug!("Model answer held no parseable JSON ({} chars)", text.len());
        }
        Ok(parsed)
    }
}

/// Answer text of a completed response body.
fn answer_text(backend: LlmBackend, payload: &Value) -> Option<String> {
    let text = match backend {
        LlmBackend::Anthropic => payload["content"]
            .as_array()?
            .iter()
            .find(|block| block["type"] == "text")?["text"]
            .as_str(),
        LlmBackend::OpenAi | LlmBackend::Ollama => {
            payload["choices"][0]["message"]["content"].as_str()
        }
    };
    text.map(str::to_string)
}

/// Pull the JSON document out of a model answer.
///
/// Handles bare JSON, fenced code blocks and prose around a single object.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_config(toml_text: &str) -> UserConfig {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_extract_json_from_model_answers() {
        assert_eq!(
            extract_json("  {\"style\": \"terse\"}\n"),
            Some(json!({"style": "terse"}))
        );
        assert_eq!(extract_json("[1, 2]"), Some(json!([1, 2])));
        assert_eq!(
            extract_json("```json\n{\"patterns\": {\"tests\": true}}\n```"),
            Some(json!({"patterns": {"tests": true}}))
        );
        assert_eq!(
            extract_json("Sure. {\"a\": {\"b\": 1}} Let me know."),
            Some(json!({"a": {"b": 1}}))
        );
    }

    #[test]
    fn test_extract_json_rejects_non_json() {
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("I could not analyze these commits."), None);
        assert_eq!(extract_json("} reversed {"), None);
        assert_eq!(extract_json("{\"truncated\": [1, 2"), None);
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let client = AiClient::from_user_config(&user_config(
            "[ai]\nbackend = \"ollama\"\nollama_model = \"codellama\"\n",
        ))
        .unwrap();
        assert_eq!(client.backend(), LlmBackend::Ollama);
        assert_eq!(client.model(), "codellama");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_keyed_backends_require_a_key() {
        for (backend, env_var) in [
            ("anthropic", "ANTHROPIC_API_KEY"),
            ("openai", "OPENAI_API_KEY"),
        ] {
            let config = user_config(&format!("[ai]\nbackend = \"{backend}\"\n"));
            match AiClient::from_user_config(&config) {
                Err(AiError::MissingApiKey { env_var: missing, .. }) => assert_eq!(missing, env_var),
                Err(other) => panic!("unexpected error {other}"),
                Ok(_) => panic!("{backend} accepted without a key"),
            }
        }
        assert!(AiClient::new(LlmBackend::OpenAi, None, Some(String::new())).is_err());
    }

    #[test]
    fn test_openai_uses_default_model_and_key() {
        let client = AiClient::from_user_config(&user_config(
            "[ai]\nbackend = \"openai\"\nopenai_api_key = \"sk-test\"\n",
        ))
        .unwrap();
        assert_eq!(client.backend(), LlmBackend::OpenAi);
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_anthropic_body_carries_system_separately() {
        let client = AiClient::new(LlmBackend::Anthropic, None, Some("sk-ant".into())).unwrap();
        let body = client.request_body("describe");
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["messages"], json!([{"role": "user", "content": "describe"}]));
    }

    #[test]
    fn test_chat_body_puts_system_first() {
        let client = AiClient::new(LlmBackend::Ollama, Some("llama3".into()), None).unwrap();
        let body = client.request_body("describe");
        assert_eq!(body["model"], "llama3");
        assert!(body.get("system").is_none());
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1], json!({"role": "user", "content": "describe"}));
    }

    #[test]
    fn test_answer_text_per_backend() {
        let anthropic = json!({"content": [
            {"type": "thinking", "thinking": "..."},
            {"type": "text", "text": "{\"ok\": true}"}
        ]});
        assert_eq!(
            answer_text(LlmBackend::Anthropic, &anthropic).as_deref(),
            Some("{\"ok\": true}")
        );

        let chat = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        assert_eq!(answer_text(LlmBackend::OpenAi, &chat).as_deref(), Some("{}"));
        assert_eq!(answer_text(LlmBackend::Ollama, &chat).as_deref(), Some("{}"));

        assert!(answer_text(LlmBackend::OpenAi, &json!({"choices": []})).is_none());
        assert!(answer_text(LlmBackend::Anthropic, &json!({"error": "overloaded"})).is_none());
    }
}
