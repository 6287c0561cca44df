use crate::agents::catalog;
use crate::api::extract::ValidJson;
use crate::api::handlers::{run_agent, run_pipeline};
use crate::types::{Result, StoryRequest, StoryResponse};
use crate::workflows::story::advanced_story;
use crate::AppState;
use axum::{extract::State, Json};

/// One-line outline from the baseline story agent
#[utoipa::path(
    post,
    path = "/agents/story/baseline",
    request_body = StoryRequest,
    responses(
        (status = 200, description = "Story outline", body = StoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "story",
    security(("api_key" = []))
)]
pub async fn baseline(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<StoryRequest>,
) -> Result<Json<StoryResponse>> {
    let run = run_agent(&state, &catalog::baseline_story(), &payload.topic).await;
    Ok(Json(StoryResponse {
        outline: run.result?.final_output,
    }))
}

/// Multi-line outline from the custom story agent
#[utoipa::path(
    post,
    path = "/agents/story/custom",
    request_body = StoryRequest,
    responses(
        (status = 200, description = "Story outline", body = StoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "story",
    security(("api_key" = []))
)]
pub async fn custom(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<StoryRequest>,
) -> Result<Json<StoryResponse>> {
    let run = run_agent(&state, &catalog::custom_story(), &payload.topic).await;
    Ok(Json(StoryResponse {
        outline: run.result?.final_output,
    }))
}

/// Outline agent, then story body agent
#[utoipa::path(
    post,
    path = "/agents/story/advanced",
    request_body = StoryRequest,
    responses(
        (status = 200, description = "Complete story", body = StoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "story",
    security(("api_key" = []))
)]
pub async fn advanced(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<StoryRequest>,
) -> Result<Json<StoryResponse>> {
    let run = run_pipeline(&state, &advanced_story(), &payload.topic).await;
    Ok(Json(StoryResponse {
        outline: run.result?.final_response,
    }))
}
