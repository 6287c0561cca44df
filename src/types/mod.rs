use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Free-form message sent to an agent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageRequest {
    /// The user's message to the agent.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// The agent's response.
    pub response: String,
}

/// Topic for the story endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoryRequest {
    /// The topic for generating a story outline.
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    /// The generated story outline or complete story text.
    pub outline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptUpdateRequest {
    /// The new system prompt for the dynamic agent.
    pub new_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptUpdateResponse {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptExecuteRequest {
    /// Input for the dynamic prompt agent.
    pub input: String,
}

/// Direct completion request against one LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderReply {
    /// "success" or "error"
    pub status: String,
    /// Completion text or error message
    pub message: String,
    /// Model used for generation
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// reasoning, conversation, creative, code
    pub task_type: String,
    /// Prompt length in characters
    #[serde(default = "default_prompt_length")]
    pub prompt_length: usize,
}

fn default_prompt_length() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Recommendation {
    pub status: String,
    pub recommended_provider: String,
    pub model: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrchestrationRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrchestrationResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail_triggered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Request bodies reject blank text before any agent runs.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

impl Validate for MessageRequest {
    fn validate(&self) -> Result<()> {
        require_text("message", &self.message)
    }
}

impl Validate for StoryRequest {
    fn validate(&self) -> Result<()> {
        require_text("topic", &self.topic)
    }
}

impl Validate for PromptUpdateRequest {
    fn validate(&self) -> Result<()> {
        require_text("new_prompt", &self.new_prompt)
    }
}

impl Validate for PromptExecuteRequest {
    fn validate(&self) -> Result<()> {
        require_text("input", &self.input)
    }
}

impl Validate for ProviderRequest {
    fn validate(&self) -> Result<()> {
        require_text("prompt", &self.prompt)?;
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AppError::Validation(
                    "'temperature' must be between 0 and 2".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for RecommendRequest {
    fn validate(&self) -> Result<()> {
        require_text("task_type", &self.task_type)
    }
}

// Guardrail endpoints must see blank input so the guardrail can report it.
impl Validate for OrchestrationRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl OrchestrationRequest {
    /// Routing endpoints need text to route on
    pub fn require_message(&self) -> Result<()> {
        require_text("message", &self.message)
    }

    /// The context object as JSON text, when a non-empty one was sent
    pub fn context_text(&self) -> Option<String> {
        self.context
            .as_ref()
            .filter(|ctx| !ctx.is_null() && ctx.as_object().is_none_or(|m| !m.is_empty()))
            .map(|ctx| ctx.to_string())
    }

    /// The message, followed by the context object when one was sent
    pub fn agent_input(&self) -> String {
        match self.context_text() {
            Some(ctx) => with_context(&self.message, &ctx),
            None => self.message.clone(),
        }
    }
}

/// Append a context note to an agent's input text
pub fn with_context(input: &str, context: &str) -> String {
    format!("{}\n\nContext: {}", input, context)
}

// ============= Chat Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One message of a chat exchange, provider-neutral.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Tool calls requested by the assistant in this message
    pub tool_calls: Vec<ToolCall>,
    /// Set on tool messages: the call this message answers
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: Some(call_id.into()),
        }
    }

    fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("LLM provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Max turns ({0}) exceeded")]
    MaxTurnsExceeded(usize),

    #[error("Guardrail '{guardrail}' triggered: {reason}")]
    GuardrailTriggered { guardrail: String, reason: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be read as JSON at all
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, detail) = match &self {
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Rejected { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
                message.clone(),
            ),
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", self))
            }
        };

        let body = serde_json::json!({
            "detail": detail
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
