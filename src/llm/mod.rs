//! LLM provider clients and abstractions
//!
//! - [`LLMClient`] - the trait every provider client implements
//! - [`OpenAIClient`] - OpenAI-compatible chat completions over `reqwest`
//! - [`ProviderRegistry`] - one client per hosted provider (OpenAI, Gemini, Requesty, OpenRouter)
//! - [`recommend`] - rule-based provider/model recommendation
//!
//! # Streaming
//!
//! [`LLMClient::stream_chat`] yields text deltas parsed from the provider's
//! server-sent events and ends at the `[DONE]` marker.

/// Core LLM client trait and request/response types.
pub mod client;
/// OpenAI-compatible HTTP client.
pub mod openai;
/// Registry of hosted providers.
pub mod provider_registry;
/// Task-based model recommendation.
pub mod recommender;

pub use client::{ChatRequest, LLMClient, LLMResponse, ToolChoice};
pub use openai::OpenAIClient;
pub use provider_registry::{categorize_error, ProviderKind, ProviderRegistry};
pub use recommender::recommend;
