//! Mock implementations for testing.
//!
//! [`MockLLMClient`] stands in for the hosted model so the HTTP layer can be
//! exercised end to end without network access.

use async_trait::async_trait;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use workshop::llm::{ChatRequest, LLMClient, LLMResponse};
use workshop::types::{AppError, ChatMessage, MessageRole, Result, ToolCall, ToolDefinition};

#[derive(Clone)]
enum Behavior {
    /// Always answer with this text
    Text(String),
    /// Call the first offered tool, then repeat its output
    UseTools,
    /// Every call fails
    Fail,
    /// Chat works; streams fail after the first fragment
    BrokenStream,
}

/// Mock LLM client with scripted and rule-based responses.
///
/// # Examples
///
/// ```ignore
/// // Always answer with a fixed string
/// let client = MockLLMClient::new("Hello there!");
///
/// // Call the first tool the agent offers, then return its output
/// let client = MockLLMClient::tool_user();
///
/// // Queue exact responses (e.g. a handoff) before falling back
/// let client = MockLLMClient::new("done").with_script(vec![handoff("transfer_to_math_agent")]);
///
/// // Fail every request
/// let client = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    behavior: Behavior,
    script: Mutex<VecDeque<LLMResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLLMClient {
    pub fn new(response: &str) -> Self {
        Self::with_behavior(Behavior::Text(response.to_string()))
    }

    pub fn tool_user() -> Self {
        Self::with_behavior(Behavior::UseTools)
    }

    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Fail)
    }

    pub fn broken_stream() -> Self {
        Self::with_behavior(Behavior::BrokenStream)
    }

    /// Responses returned, in order, before the fallback behaviour applies
    pub fn with_script(self, script: Vec<LLMResponse>) -> Self {
        *self.script.lock() = script.into();
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(vec![]),
        }
    }
}

/// A model turn that calls one tool
pub fn tool_call(name: &str, arguments: Value) -> LLMResponse {
    LLMResponse::calls(vec![ToolCall {
        id: format!("call_{}", name),
        name: name.to_string(),
        arguments,
    }])
}

/// A model turn that hands off through a transfer tool
pub fn handoff(transfer_tool: &str) -> LLMResponse {
    tool_call(transfer_tool, json!({}))
}

fn last_user_message(request: &ChatRequest) -> String {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

/// Fill every required parameter from the user's message
fn arguments_for(tool: &ToolDefinition, user: &str) -> Value {
    let mut args = Map::new();
    let required = tool.parameters["required"].as_array().cloned().unwrap_or_default();
    for name in required.iter().filter_map(|n| n.as_str()) {
        let value = match tool.parameters["properties"][name]["type"].as_str() {
            Some("number") | Some("integer") => json!(2),
            Some("array") => json!([user]),
            _ => json!(user),
        };
        args.insert(name.to_string(), value);
    }
    Value::Object(args)
}

/// True when `message` is the runner's answer to a transfer call
fn answers_handoff(request: &ChatRequest, message: &ChatMessage) -> bool {
    request
        .messages
        .iter()
        .flat_map(|m| &m.tool_calls)
        .any(|c| Some(&c.id) == message.tool_call_id.as_ref() && c.name.starts_with("transfer_to_"))
}

fn use_tools(request: &ChatRequest) -> LLMResponse {
    if let Some(last) = request.messages.last() {
        if last.role == MessageRole::Tool && !answers_handoff(request, last) {
            return LLMResponse::text(last.content.clone());
        }
    }

    let user = last_user_message(request);
    match request
        .tools
        .iter()
        .find(|t| !t.name.starts_with("transfer_to_"))
    {
        Some(tool) => tool_call(&tool.name, arguments_for(tool, &user)),
        None => LLMResponse::text(format!("Mock reply to: {}", user)),
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: ChatRequest) -> Result<LLMResponse> {
        self.requests.lock().push(request.clone());

        if let Behavior::Fail = self.behavior {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        if let Some(next) = self.script.lock().pop_front() {
            return Ok(next);
        }

        let mut response = match &self.behavior {
            Behavior::Text(text) => LLMResponse::text(text.clone()),
            Behavior::UseTools => use_tools(&request),
            Behavior::BrokenStream => LLMResponse::text("partial answer"),
            Behavior::Fail => unreachable!(),
        };
        response.model = "mock-model".to_string();
        Ok(response)
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<BoxStream<'static, Result<String>>> {
        let behavior = self.behavior.clone();
        let response = self.chat(request).await?;

        let mut chunks: Vec<Result<String>> = response
            .content
            .split_inclusive(' ')
            .map(|w| Ok(w.to_string()))
            .collect();
        if let Behavior::BrokenStream = behavior {
            chunks.truncate(1);
            chunks.push(Err(AppError::LLM("stream dropped".to_string())));
        }

        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_tool(tool: ToolDefinition, user: &str) -> ChatRequest {
        ChatRequest::new(vec![ChatMessage::system("sys"), ChatMessage::user(user)]).with_tools(vec![tool])
    }

    #[tokio::test]
    async fn test_tool_user_fills_required_args() {
        let client = MockLLMClient::tool_user();
        let tool = ToolDefinition {
            name: "add".to_string(),
            description: "add".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                "required": ["a", "b"]
            }),
        };

        let response = client.chat(request_with_tool(tool, "sum")).await.unwrap();
        assert_eq!(response.tool_calls[0].arguments, json!({"a": 2, "b": 2}));
    }

    #[tokio::test]
    async fn test_mock_client_failing() {
        let client = MockLLMClient::failing();
        assert!(client.chat(ChatRequest::default()).await.is_err());
        assert_eq!(client.requests().len(), 1);
    }
}
