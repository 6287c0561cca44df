use crate::types::{AppError, Result};
use std::env;
use std::str::FromStr;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub auth: AuthConfig,
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub requesty_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct AgentsConfig {
    /// Upper bound on model round-trips per agent run
    pub max_turns: usize,
    /// Number of finished traces kept in memory
    pub trace_capacity: usize,
}

impl Config {
    /// Load `.env` (if any) and read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| {
                AppError::Configuration(format!("{} is missing. Please set it in .env.", key))
            })
        };

        let config = Config {
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_or(&var, "PORT", 8000)?,
            },
            llm: LLMConfig {
                openai_api_key: required("OPENAI_API_KEY")?,
                openai_api_base: var("OPENAI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
                model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_secs: parse_or(&var, "LLM_TIMEOUT_SECS", 60)?,
                gemini_api_key: var("GEMINI_API_KEY"),
                requesty_api_key: var("REQUESTY_API_KEY"),
                openrouter_api_key: var("OPENROUTER_API_KEY"),
            },
            auth: AuthConfig {
                api_key: required("API_KEY")?,
            },
            agents: AgentsConfig {
                max_turns: parse_or(&var, "AGENT_MAX_TURNS", 10)?,
                trace_capacity: parse_or(&var, "TRACE_CAPACITY", 100)?,
            },
        };

        if config.agents.max_turns == 0 {
            return Err(AppError::Configuration(
                "AGENT_MAX_TURNS must be at least 1".to_string(),
            ));
        }

        for (key, value) in [
            ("GEMINI_API_KEY", &config.llm.gemini_api_key),
            ("REQUESTY_API_KEY", &config.llm.requesty_api_key),
            ("OPENROUTER_API_KEY", &config.llm.openrouter_api_key),
        ] {
            if value.is_none() {
                tracing::warn!("{} is missing. That provider will report an error when used.", key);
            }
        }

        Ok(config)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
