//! Provider Registry for the hosted LLM providers
//!
//! Every supported provider exposes an OpenAI-compatible chat endpoint, so the
//! registry only needs a base URL, a key and a default model per provider.
//! Providers whose key is missing stay listed; using them yields an error reply
//! instead of a failed request.

use crate::llm::client::{ChatRequest, LLMClient};
use crate::llm::openai::OpenAIClient;
use crate::types::{AppError, ChatMessage, ProviderReply, ProviderRequest, Result};
use crate::utils::config::Config;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Completion length used when the caller does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 100;
/// Sampling temperature used when the caller does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAI,
    Gemini,
    Requesty,
    OpenRouter,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Gemini,
        ProviderKind::Requesty,
        ProviderKind::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Requesty => "requesty",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            ProviderKind::Requesty => "https://router.requesty.ai/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Environment variable holding this provider's key
    pub fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Requesty => "REQUESTY_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-1.5-pro",
            ProviderKind::Requesty => "cline/o3-mini",
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "gemini" => Ok(ProviderKind::Gemini),
            "requesty" | "requestry" => Ok(ProviderKind::Requesty),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            other => Err(AppError::NotFound(format!("Unknown provider '{}'", other))),
        }
    }
}

struct Slot {
    client: Arc<dyn LLMClient>,
    default_model: String,
}

/// Registry of provider clients keyed by [`ProviderKind`]
pub struct ProviderRegistry {
    slots: HashMap<ProviderKind, Slot>,
}

impl ProviderRegistry {
    /// Create an empty registry; every provider reports a missing key
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Create clients for every provider with a configured key
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.llm.timeout_secs);
        let mut registry = Self::new();

        for kind in ProviderKind::ALL {
            let (key, base, model) = match kind {
                ProviderKind::OpenAI => (
                    Some(config.llm.openai_api_key.clone()),
                    config.llm.openai_api_base.clone(),
                    config.llm.model.clone(),
                ),
                ProviderKind::Gemini => (
                    config.llm.gemini_api_key.clone(),
                    kind.default_base_url().to_string(),
                    kind.default_model().to_string(),
                ),
                ProviderKind::Requesty => (
                    config.llm.requesty_api_key.clone(),
                    kind.default_base_url().to_string(),
                    kind.default_model().to_string(),
                ),
                ProviderKind::OpenRouter => (
                    config.llm.openrouter_api_key.clone(),
                    kind.default_base_url().to_string(),
                    kind.default_model().to_string(),
                ),
            };

            if let Some(key) = key {
                let client = OpenAIClient::new(key, base, model.clone(), timeout)?;
                registry.register(kind, Arc::new(client), model);
            }
        }

        Ok(registry)
    }

    /// Register (or replace) the client for a provider
    pub fn register(&mut self, kind: ProviderKind, client: Arc<dyn LLMClient>, default_model: impl Into<String>) {
        self.slots.insert(
            kind,
            Slot {
                client,
                default_model: default_model.into(),
            },
        );
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Names of providers that have a key
    pub fn configured(&self) -> Vec<&'static str> {
        ProviderKind::ALL
            .iter()
            .filter(|k| self.is_configured(**k))
            .map(|k| k.as_str())
            .collect()
    }

    /// Send a single prompt to one provider.
    ///
    /// Provider failures are folded into an `"error"` reply rather than
    /// returned, so the caller always gets a structured answer.
    pub async fn complete(&self, kind: ProviderKind, request: &ProviderRequest) -> ProviderReply {
        let (client, default_model) = match self.slots.get(&kind) {
            Some(slot) => (slot.client.clone(), slot.default_model.clone()),
            None => {
                tracing::warn!(provider = %kind, "provider called without an API key");
                return ProviderReply {
                    status: "error".to_string(),
                    message: format!("{} missing in environment.", kind.key_var()),
                    model: "unknown".to_string(),
                    usage: None,
                };
            }
        };

        let model = request.model.clone().unwrap_or(default_model);
        let chat = ChatRequest::new(vec![ChatMessage::user(&request.prompt)])
            .with_model(Some(model.clone()))
            .with_max_tokens(Some(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)))
            .with_temperature(Some(request.temperature.unwrap_or(DEFAULT_TEMPERATURE)));

        match client.chat(chat).await {
            Ok(response) => ProviderReply {
                status: "success".to_string(),
                message: response.content,
                model: if response.model.is_empty() {
                    model
                } else {
                    response.model
                },
                usage: response.usage,
            },
            Err(e) => {
                tracing::error!(provider = %kind, error = %e, "provider call failed");
                ProviderReply {
                    status: "error".to_string(),
                    message: categorize_error(&e),
                    model,
                    usage: None,
                }
            }
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a provider failure to a user-facing message
pub fn categorize_error(err: &AppError) -> String {
    match err {
        AppError::Upstream { status, message } => {
            let category = match status {
                401 | 403 => "Authentication error",
                429 => "Rate limit exceeded",
                400 | 404 | 422 => "Invalid request",
                _ => "API error",
            };
            format!("{}: {}", category, message)
        }
        other => format!("API error: {}", other),
    }
}
