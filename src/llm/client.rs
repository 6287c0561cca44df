//! LLM client abstraction
//!
//! Every provider speaks the same OpenAI-compatible chat protocol, so a single
//! trait covers plain completions, tool calling and streaming.

use crate::types::{ChatMessage, Result, ToolCall, ToolDefinition, Usage};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Generic LLM client trait for provider abstraction
///
/// Agents, pipelines and handlers only ever see `Arc<dyn LLMClient>`, which lets
/// tests swap in a scripted client.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one chat completion
    async fn chat(&self, request: ChatRequest) -> Result<LLMResponse>;

    /// Stream the text deltas of one chat completion
    async fn stream_chat(&self, request: ChatRequest) -> Result<BoxStream<'static, Result<String>>>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(prompt)]);
        Ok(self.chat(request).await?.content)
    }
}

/// How the model may use the offered tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "required",
            ToolChoice::None => "none",
        }
    }
}

/// A single chat completion request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    /// Overrides the client's default model
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from an LLM generation request
#[derive(Debug, Clone, Default)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
    /// Token accounting, when the provider reports it
    pub usage: Option<Usage>,
    /// Model that actually served the request
    pub model: String,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            ..Default::default()
        }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            finish_reason: "tool_calls".to_string(),
            ..Default::default()
        }
    }
}
