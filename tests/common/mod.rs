//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod mocks;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use mocks::MockLLMClient;
use std::sync::Arc;
use workshop::api::routes::create_router;
use workshop::llm::ProviderRegistry;
use workshop::{AppState, Config};

pub const TEST_API_KEY: &str = "test-key";

pub fn api_key_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static(TEST_API_KEY),
    )
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "API_KEY" => Some(TEST_API_KEY.to_string()),
        "AGENT_MAX_TURNS" => Some("5".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_state(llm: Arc<MockLLMClient>) -> AppState {
    AppState::new(test_config(), llm, ProviderRegistry::new())
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// Server around a mock client, with the client kept for assertions
pub fn server_with(llm: MockLLMClient) -> (TestServer, Arc<MockLLMClient>, AppState) {
    let llm = Arc::new(llm);
    let state = test_state(llm.clone());
    (test_server(state.clone()), llm, state)
}
