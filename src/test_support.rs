//! Scripted LLM client shared by unit tests.

use crate::llm::{ChatRequest, LLMClient, LLMResponse};
use crate::types::{AppError, Result, ToolCall};
use async_trait::async_trait;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// Returns queued responses in order and records every request
pub struct ScriptedLLM {
    script: Mutex<VecDeque<Result<LLMResponse>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLLM {
    pub fn new(script: Vec<Result<LLMResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

pub fn call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

#[async_trait]
impl LLMClient for ScriptedLLM {
    async fn chat(&self, request: ChatRequest) -> Result<LLMResponse> {
        self.requests.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLM("script exhausted".to_string())))
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<BoxStream<'static, Result<String>>> {
        let response = self.chat(request).await?;
        let words: Vec<Result<String>> = response
            .content
            .split_inclusive(' ')
            .map(|w| Ok(w.to_string()))
            .collect();
        Ok(Box::pin(futures::stream::iter(words)))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
