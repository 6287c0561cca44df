use crate::agents::{catalog, RunHooks};
use crate::api::extract::ValidJson;
use crate::api::handlers::run_agent;
use crate::tracing_store::TraceCollector;
use crate::types::{
    MessageRequest, MessageResponse, PromptExecuteRequest, PromptUpdateRequest,
    PromptUpdateResponse, Result,
};
use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::Instrument;

/// Run the generic lifecycle agent and its utility tools
#[utoipa::path(
    post,
    path = "/agents/basic/generic-lifecycle/execute",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Agent response", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "basic",
    security(("api_key" = []))
)]
pub async fn generic_lifecycle(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let run = run_agent(&state, &catalog::generic_lifecycle(), &payload.message).await;
    let result = run.result?;
    tracing::debug!(
        turns = result.turns,
        tool_calls = result.tool_calls.len(),
        "generic lifecycle run finished"
    );

    Ok(Json(MessageResponse {
        response: result.final_output,
    }))
}

/// Replace the dynamic agent's system prompt
#[utoipa::path(
    post,
    path = "/agents/basic/dynamic-prompt/update",
    request_body = PromptUpdateRequest,
    responses(
        (status = 200, description = "Prompt updated", body = PromptUpdateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input")
    ),
    tag = "basic",
    security(("api_key" = []))
)]
pub async fn update_prompt(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PromptUpdateRequest>,
) -> Result<Json<PromptUpdateResponse>> {
    let prompt = state.dynamic_prompt.set(payload.new_prompt);
    tracing::info!(chars = prompt.chars().count(), "dynamic prompt updated");

    Ok(Json(PromptUpdateResponse {
        prompt: prompt.to_string(),
    }))
}

/// Run the dynamic agent with the current system prompt
#[utoipa::path(
    post,
    path = "/agents/basic/dynamic-prompt/execute",
    request_body = PromptExecuteRequest,
    responses(
        (status = 200, description = "Agent response", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "basic",
    security(("api_key" = []))
)]
pub async fn execute_prompt(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PromptExecuteRequest>,
) -> Result<Json<MessageResponse>> {
    let instructions = state.dynamic_prompt.get();
    let agent = catalog::dynamic_prompt(&instructions);
    let run = run_agent(&state, &agent, &payload.input).await;

    Ok(Json(MessageResponse {
        response: run.result?.final_output,
    }))
}

/// Stream the assistant's answer as server-sent events
///
/// Emits one `delta` event per text fragment, then either `done` with data
/// `[DONE]` or a single `error` event. Failures before the first fragment
/// (guardrails, upstream errors) are returned as regular error responses.
#[utoipa::path(
    post,
    path = "/agents/basic/stream-text",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Event stream of text deltas", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "basic",
    security(("api_key" = []))
)]
pub async fn stream_text(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<MessageRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let agent = catalog::stream_text();
    let collector = TraceCollector::new(&agent.name);
    let trace_id = collector.trace_id().to_string();

    let setup = state
        .runner
        .stream_text(&agent, &payload.message, &collector)
        .instrument(collector.span())
        .await;

    let mut deltas = match setup {
        Ok(deltas) => deltas,
        Err(e) => {
            state.traces.push(collector.close(Some(&e)));
            return Err(e);
        }
    };

    // Upstream rejections surface on the first poll
    let first = match deltas.next().await {
        Some(Err(e)) => {
            state.traces.push(collector.close(Some(&e)));
            return Err(e);
        }
        first => first,
    };
    let mut deltas = futures::stream::iter(first).chain(deltas);

    let traces = state.traces.clone();
    let stream = async_stream::stream! {
        let mut output = String::new();
        let mut failure = None;

        while let Some(item) = deltas.next().await {
            match item {
                Ok(delta) => {
                    output.push_str(&delta);
                    // Event data may not carry carriage returns
                    yield Ok::<_, Infallible>(Event::default().event("delta").data(delta.replace('\r', "")));
                }
                Err(e) => {
                    tracing::warn!(trace_id = %trace_id, error = %e, "stream interrupted");
                    yield Ok::<_, Infallible>(Event::default().event("error").data(e.to_string().replace('\r', "")));
                    failure = Some(e);
                    break;
                }
            }
        }

        if failure.is_none() {
            collector.on_agent_end(&agent, &output);
            yield Ok::<_, Infallible>(Event::default().event("done").data("[DONE]"));
        }
        traces.push(collector.close(failure.as_ref()));
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
