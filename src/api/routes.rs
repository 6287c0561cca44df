use crate::api::handlers::{basic, health, hello, orchestration, providers, story};
use crate::api::openapi::ApiDoc;
use crate::auth::middleware::api_key_middleware;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

/// Request bodies are small JSON documents
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full router with state applied
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let protected_routes = Router::new()
        // Hello world
        .route("/agent/hello", post(hello::hello))
        .route("/agent/deterministic", post(hello::deterministic))
        // Story
        .route("/agents/story/baseline", post(story::baseline))
        .route("/agents/story/custom", post(story::custom))
        .route("/agents/story/advanced", post(story::advanced))
        // Basic agents
        .route(
            "/agents/basic/generic-lifecycle/execute",
            post(basic::generic_lifecycle),
        )
        .route(
            "/agents/basic/dynamic-prompt/update",
            post(basic::update_prompt),
        )
        .route(
            "/agents/basic/dynamic-prompt/execute",
            post(basic::execute_prompt),
        )
        .route("/agents/basic/stream-text", post(basic::stream_text))
        // LLM providers; the static route wins over the parameter
        .route(
            "/agents/llm-provider/recommend-model",
            post(providers::recommend_model),
        )
        .route(
            "/agents/llm-provider/{provider}",
            post(providers::call_provider),
        )
        // Orchestration
        .route(
            "/agents/orchestration/handoffs",
            post(orchestration::handoffs),
        )
        .route(
            "/agents/orchestration/combined",
            post(orchestration::combined),
        )
        .route(
            "/agents/orchestration/input-guardrails",
            post(orchestration::input_guardrails),
        )
        .route(
            "/agents/orchestration/output-guardrails",
            post(orchestration::output_guardrails),
        )
        .route(
            "/agents/orchestration/trace-status",
            get(orchestration::trace_status),
        )
        .route(
            "/agents/orchestration/trace-status/{trace_id}",
            get(orchestration::trace_by_id),
        )
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    let router = public_routes.merge(protected_routes);

    // Swagger UI sits behind the same key check as the API itself
    #[cfg(feature = "swagger-ui")]
    let router = {
        let docs: Router<AppState> = utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/swagger-ui/openapi.json", ApiDoc::openapi())
            .into();
        router.merge(docs.route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        )))
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
