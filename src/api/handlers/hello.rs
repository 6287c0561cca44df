use crate::agents::catalog;
use crate::api::extract::ValidJson;
use crate::api::handlers::{run_agent, run_pipeline};
use crate::types::{MessageRequest, MessageResponse, Result};
use crate::workflows::story::deterministic_story;
use crate::AppState;
use axum::{extract::State, Json};

/// Greet the user through the hello agent
#[utoipa::path(
    post,
    path = "/agent/hello",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Agent response", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "hello",
    security(("api_key" = []))
)]
pub async fn hello(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let run = run_agent(&state, &catalog::hello(), &payload.message).await;
    let result = run.result?;

    Ok(Json(MessageResponse {
        response: result.final_output,
    }))
}

/// Run the outline, story and ending tools in a fixed order
#[utoipa::path(
    post,
    path = "/agent/deterministic",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Generated story", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Workflow failure")
    ),
    tag = "hello",
    security(("api_key" = []))
)]
pub async fn deterministic(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let run = run_pipeline(&state, &deterministic_story(), &payload.message).await;
    let output = run.result?;
    tracing::debug!(steps = output.steps_executed, "deterministic flow finished");

    Ok(Json(MessageResponse {
        response: output.final_response,
    }))
}
