//! # Agent Workshop
//!
//! An HTTP service that composes calls to a hosted LLM through small,
//! pre-built agents. Three composition patterns are on show:
//!
//! - **Deterministic** - a fixed sequence of tool calls with no branching
//! - **Handoff** - a triage agent lets the model pick one specialist
//! - **Combined** - deterministic steps followed by a handoff
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - run the `agent-workshop` binary
//! 2. **As a library** - build agents and pipelines in your own code
//!
//! ### Running an agent
//!
//! ```rust,ignore
//! use workshop::agents::{catalog, NoopHooks, Runner};
//! use workshop::llm::OpenAIClient;
//! use workshop::tools::ToolRegistry;
//! use std::{sync::Arc, time::Duration};
//!
//! let llm = OpenAIClient::new(key, base_url, "gpt-4o-mini".into(), Duration::from_secs(60))?;
//! let runner = Runner::new(Arc::new(llm), Arc::new(ToolRegistry::with_default_tools()), 10);
//!
//! let result = runner.run(&catalog::triage(), "Tell me a story about owls", &NoopHooks).await?;
//! println!("{} answered: {}", result.last_agent, result.final_output);
//! ```
//!
//! ### Running a pipeline
//!
//! ```rust,ignore
//! use workshop::workflows::story;
//!
//! let output = story::deterministic_story()
//!     .run(&runner, "a cat named Whiskers", &NoopHooks)
//!     .await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Interactive API documentation at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`agents`] - agent configuration, the run loop, guardrails and hooks
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - API key middleware
//! - [`llm`] - LLM client trait, OpenAI-compatible client, provider registry
//! - [`tools`] - tool trait, registry and built-in tools
//! - [`tracing_store`] - run traces
//! - [`workflows`] - sequential pipelines and the story flows
//! - [`types`] - request/response types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Agents, the run loop and the prebuilt catalog.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// API key authentication.
pub mod auth;
/// LLM provider clients and abstractions.
pub mod llm;
/// Built-in tools and the tool registry.
pub mod tools;
/// Trace collection and the in-memory trace store.
pub mod tracing_store;
/// Core types (requests, responses, errors).
pub mod types;
/// Environment configuration.
pub mod utils;
/// Sequential pipelines.
pub mod workflows;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use agents::{Agent, DynamicPrompt, Runner};
pub use llm::{LLMClient, LLMResponse, OpenAIClient, ProviderRegistry};
pub use tools::ToolRegistry;
pub use tracing_store::TraceStore;
pub use types::{AppError, Result};
pub use utils::config::Config;
pub use workflows::{Pipeline, WorkflowOutput, WorkflowStep};

use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Environment configuration
    pub config: Arc<Config>,
    /// Default LLM client used by every agent
    pub llm: Arc<dyn LLMClient>,
    /// Agent runner over the default client and the tool registry
    pub runner: Arc<Runner>,
    /// Tool registry for agent tools
    pub tools: Arc<ToolRegistry>,
    /// Clients for the direct provider endpoints
    pub providers: Arc<ProviderRegistry>,
    /// Recently finished traces
    pub traces: Arc<TraceStore>,
    /// System prompt of the dynamic-prompt agent
    pub dynamic_prompt: Arc<DynamicPrompt>,
}

impl AppState {
    /// Assemble state around an existing client and provider registry
    pub fn new(config: Config, llm: Arc<dyn LLMClient>, providers: ProviderRegistry) -> Self {
        let tools = Arc::new(ToolRegistry::with_default_tools());
        let runner = Arc::new(Runner::new(
            llm.clone(),
            tools.clone(),
            config.agents.max_turns,
        ));
        let traces = Arc::new(TraceStore::new(config.agents.trace_capacity));

        Self {
            config: Arc::new(config),
            llm,
            runner,
            tools,
            providers: Arc::new(providers),
            traces,
            dynamic_prompt: Arc::new(DynamicPrompt::default()),
        }
    }

    /// Build the OpenAI client and every configured provider from `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let llm = OpenAIClient::new(
            config.llm.openai_api_key.clone(),
            config.llm.openai_api_base.clone(),
            config.llm.model.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        )?;
        let providers = ProviderRegistry::from_config(&config)?;
        tracing::info!(
            model = %llm.model_name(),
            providers = ?providers.configured(),
            "LLM clients ready"
        );

        Ok(Self::new(config, Arc::new(llm), providers))
    }
}
