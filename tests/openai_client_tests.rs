//! OpenAI-compatible client against a wiremock server.

use futures::StreamExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workshop::agents::{catalog, NoopHooks, Runner};
use workshop::llm::{ChatRequest, LLMClient, OpenAIClient, ProviderKind, ProviderRegistry};
use workshop::tools::ToolRegistry;
use workshop::types::{AppError, ChatMessage, ProviderRequest, ToolDefinition};

fn client(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(
        "sk-test".to_string(),
        format!("{}/v1", server.uri()),
        "gpt-4o-mini".to_string(),
        Duration::from_secs(5),
    )
    .expect("client")
}

fn chat_response(content: Value, tool_calls: Value) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content, "tool_calls": tool_calls},
            "finish_reason": if tool_calls.is_null() { "stop" } else { "tool_calls" }
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    })
}

fn error_response(message: &str) -> Value {
    json!({"error": {"message": message, "type": "invalid_request_error"}})
}

fn user(text: &str) -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user(text)])
}

#[tokio::test]
async fn test_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(json!("Hi there!"), Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).chat(user("Hello")).await.unwrap();

    assert_eq!(response.content, "Hi there!");
    assert_eq!(response.finish_reason, "stop");
    assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
    assert_eq!(response.usage.unwrap().total_tokens, 17);
    assert!(response.tool_calls.is_empty());
}

#[tokio::test]
async fn test_chat_parses_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"tool_choice": "auto", "tools": [{"type": "function"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
            Value::Null,
            json!([{
                "id": "call_abc",
                "type": "function",
                "function": {"name": "echo", "arguments": "{\"message\":\"hi\"}"}
            }]),
        )))
        .mount(&server)
        .await;

    let request = user("Echo hi").with_tools(vec![ToolDefinition {
        name: "echo".to_string(),
        description: "Echo a message".to_string(),
        parameters: json!({"type": "object", "properties": {"message": {"type": "string"}}}),
    }]);
    let response = client(&server).chat(request).await.unwrap();

    assert_eq!(response.content, "");
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].id, "call_abc");
    assert_eq!(response.tool_calls[0].name, "echo");
    assert_eq!(response.tool_calls[0].arguments, json!({"message": "hi"}));
}

#[tokio::test]
async fn test_error_status_becomes_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_response("Incorrect API key provided")))
        .mount(&server)
        .await;

    let err = client(&server).chat(user("Hello")).await.unwrap_err();

    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_streaming_yields_deltas_until_done() {
    let server = MockServer::start().await;
    let body = [
        r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#,
        r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#,
        r#"data: {"choices":[{"delta":{"content":", world"}}]}"#,
        "data: [DONE]",
    ]
    .join("\n\n")
        + "\n\n";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let stream = client(&server).stream_chat(user("Hello")).await.unwrap();
    let parts: Vec<String> = stream.map(|r| r.unwrap()).collect().await;

    assert_eq!(parts, vec!["Hello", ", world"]);
}

#[tokio::test]
async fn test_streaming_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_response("Slow down")))
        .mount(&server)
        .await;

    let mut stream = client(&server).stream_chat(user("Hello")).await.unwrap();
    let first = stream.next().await.expect("one item");

    assert!(matches!(first, Err(AppError::Upstream { status: 429, .. })));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_runner_drives_tool_loop_over_http() {
    let server = MockServer::start().await;
    // First turn calls the tool; the second answers with its output
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(r#""role":"tool","content":"Hello, world!""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(json!("Hello, world! Nice to meet you."), Value::Null)))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
            Value::Null,
            json!([{
                "id": "call_1",
                "type": "function",
                "function": {"name": "hello_world_tool", "arguments": "{}"}
            }]),
        )))
        .with_priority(2)
        .mount(&server)
        .await;

    let runner = Runner::new(
        Arc::new(client(&server)),
        Arc::new(ToolRegistry::with_default_tools()),
        5,
    );
    let result = runner
        .run(&catalog::hello(), "Say hello", &NoopHooks)
        .await
        .unwrap();

    assert_eq!(result.final_output, "Hello, world! Nice to meet you.");
    assert_eq!(result.turns, 2);
    assert_eq!(result.tool_calls[0].output, "Hello, world!");
}

// ============= Provider registry =============

fn provider_request() -> ProviderRequest {
    ProviderRequest {
        prompt: "Tell me a joke".to_string(),
        model: None,
        max_tokens: None,
        temperature: None,
    }
}

fn registry(server: &MockServer) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(ProviderKind::Gemini, Arc::new(client(server)), "gemini-1.5-pro");
    registry
}

#[tokio::test]
async fn test_provider_success_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "gemini-1.5-pro", "max_tokens": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(json!("Why did the crab cross?"), Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let reply = registry(&server)
        .complete(ProviderKind::Gemini, &provider_request())
        .await;

    assert_eq!(reply.status, "success");
    assert_eq!(reply.message, "Why did the crab cross?");
    assert_eq!(reply.usage.unwrap().prompt_tokens, 12);
}

#[tokio::test]
async fn test_provider_rate_limit_is_categorised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_response("Too many requests")))
        .mount(&server)
        .await;

    let reply = registry(&server)
        .complete(ProviderKind::Gemini, &provider_request())
        .await;

    assert_eq!(reply.status, "error");
    assert_eq!(reply.message, "Rate limit exceeded: Too many requests");
    assert_eq!(reply.model, "gemini-1.5-pro");
}
