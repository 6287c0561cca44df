use crate::api::handlers::{basic, health, hello, orchestration, providers, story};
use crate::auth::middleware::API_KEY_HEADER;
use crate::tracing_store::{TraceEvent, TraceEventKind, TraceRecord, TraceStatus};
use crate::types::{
    MessageRequest, MessageResponse, OrchestrationRequest, OrchestrationResponse,
    PromptExecuteRequest, PromptUpdateRequest, PromptUpdateResponse, ProviderReply,
    ProviderRequest, RecommendRequest, Recommendation, StoryRequest, StoryResponse, Usage,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::root,
        health::health,
        // Hello world
        hello::hello,
        hello::deterministic,
        // Story
        story::baseline,
        story::custom,
        story::advanced,
        // Basic agents
        basic::generic_lifecycle,
        basic::update_prompt,
        basic::execute_prompt,
        basic::stream_text,
        // LLM providers
        providers::call_provider,
        providers::recommend_model,
        // Orchestration
        orchestration::handoffs,
        orchestration::combined,
        orchestration::input_guardrails,
        orchestration::output_guardrails,
        orchestration::trace_status,
        orchestration::trace_by_id,
    ),
    info(
        title = "Agent Workshop API",
        description = "Agents composed three ways: deterministic tool pipelines, handoff routing, and both combined.",
    ),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "hello", description = "Hello agent and the deterministic story flow"),
        (name = "story", description = "Story outline agents"),
        (name = "basic", description = "Lifecycle, dynamic prompt and streaming agents"),
        (name = "llm-provider", description = "Direct provider calls and model recommendation"),
        (name = "orchestration", description = "Handoffs, guardrails and traces"),
    ),
    components(
        schemas(
            health::RootResponse,
            health::HealthResponse,
            MessageRequest,
            MessageResponse,
            StoryRequest,
            StoryResponse,
            PromptUpdateRequest,
            PromptUpdateResponse,
            PromptExecuteRequest,
            ProviderRequest,
            ProviderReply,
            Usage,
            RecommendRequest,
            Recommendation,
            OrchestrationRequest,
            OrchestrationResponse,
            orchestration::TraceStatusResponse,
            TraceRecord,
            TraceEvent,
            TraceEventKind,
            TraceStatus,
        )
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}
