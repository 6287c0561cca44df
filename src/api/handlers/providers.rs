use crate::api::extract::ValidJson;
use crate::llm::{recommend, ProviderKind};
use crate::types::{ProviderReply, ProviderRequest, RecommendRequest, Recommendation, Result};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// Send a prompt straight to one provider
///
/// Provider failures (missing key, rejected request, rate limits) come back as
/// `200` with `status: "error"`. Only an unknown provider name is a `404`.
#[utoipa::path(
    post,
    path = "/agents/llm-provider/{provider}",
    params(("provider" = String, Path, description = "openai, gemini, requesty or openrouter")),
    request_body = ProviderRequest,
    responses(
        (status = 200, description = "Provider reply", body = ProviderReply),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown provider"),
        (status = 422, description = "Invalid input")
    ),
    tag = "llm-provider",
    security(("api_key" = []))
)]
pub async fn call_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    ValidJson(payload): ValidJson<ProviderRequest>,
) -> Result<Json<ProviderReply>> {
    let kind: ProviderKind = provider.parse()?;
    let reply = state.providers.complete(kind, &payload).await;
    tracing::info!(provider = %kind, status = %reply.status, model = %reply.model, "provider call");
    Ok(Json(reply))
}

/// Recommend a provider and model for a task type and prompt size
#[utoipa::path(
    post,
    path = "/agents/llm-provider/recommend-model",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendation", body = Recommendation),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input")
    ),
    tag = "llm-provider",
    security(("api_key" = []))
)]
pub async fn recommend_model(ValidJson(payload): ValidJson<RecommendRequest>) -> Result<Json<Recommendation>> {
    Ok(Json(recommend(&payload.task_type, payload.prompt_length)))
}
