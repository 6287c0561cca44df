use crate::agents::{catalog, Agent, RunResult};
use crate::api::extract::ValidJson;
use crate::api::handlers::{run_agent, run_pipeline, Traced};
use crate::tracing_store::TraceRecord;
use crate::types::{AppError, OrchestrationRequest, OrchestrationResponse, Result};
use crate::workflows::story::combined_story;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_TRACE_LIMIT: usize = 20;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TraceQuery {
    /// Maximum number of traces to return, newest first
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TraceStatusResponse {
    pub status: String,
    pub count: usize,
    pub traces: Vec<TraceRecord>,
}

/// Let the triage agent hand the request to a specialist
#[utoipa::path(
    post,
    path = "/agents/orchestration/handoffs",
    request_body = OrchestrationRequest,
    responses(
        (status = 200, description = "Specialist response", body = OrchestrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn handoffs(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<OrchestrationRequest>,
) -> Result<Json<OrchestrationResponse>> {
    payload.require_message()?;

    let run = run_agent(&state, &catalog::triage(), &payload.agent_input()).await;
    let result = run.result?;
    let handoff_agent = result.handoffs.last().map(|h| h.to.clone());

    Ok(Json(OrchestrationResponse {
        status: "success".to_string(),
        response: Some(result.final_output),
        handoff_agent,
        trace_id: Some(run.trace_id),
        ..Default::default()
    }))
}

/// Outline the story deterministically, then route it to a genre writer
#[utoipa::path(
    post,
    path = "/agents/orchestration/combined",
    request_body = OrchestrationRequest,
    responses(
        (status = 200, description = "Written story", body = OrchestrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Workflow failure")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn combined(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<OrchestrationRequest>,
) -> Result<Json<OrchestrationResponse>> {
    payload.require_message()?;

    let pipeline = combined_story().with_context(payload.context_text());
    let run = run_pipeline(&state, &pipeline, &payload.message).await;
    let output = run.result?;
    // The triage agent is first; anyone after it received a handoff
    let handoff_agent = match output.agents_used.as_slice() {
        [_, .., last] => Some(last.clone()),
        _ => None,
    };

    Ok(Json(OrchestrationResponse {
        status: "success".to_string(),
        response: Some(output.final_response),
        handoff_agent,
        trace_id: Some(run.trace_id),
        ..Default::default()
    }))
}

/// Screen the request before the assistant sees it
#[utoipa::path(
    post,
    path = "/agents/orchestration/input-guardrails",
    request_body = OrchestrationRequest,
    responses(
        (status = 200, description = "Answer, or a blocked request", body = OrchestrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn input_guardrails(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<OrchestrationRequest>,
) -> Result<Json<OrchestrationResponse>> {
    guarded(&state, &catalog::input_guarded(), &payload).await
}

/// Screen the assistant's answer before it is returned
#[utoipa::path(
    post,
    path = "/agents/orchestration/output-guardrails",
    request_body = OrchestrationRequest,
    responses(
        (status = 200, description = "Answer, or a blocked response", body = OrchestrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid input"),
        (status = 500, description = "Agent failure")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn output_guardrails(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<OrchestrationRequest>,
) -> Result<Json<OrchestrationResponse>> {
    // Only the input-checked agent reports blank text itself
    payload.require_message()?;
    guarded(&state, &catalog::output_guarded(), &payload).await
}

async fn guarded(
    state: &AppState,
    agent: &Arc<Agent>,
    payload: &OrchestrationRequest,
) -> Result<Json<OrchestrationResponse>> {
    let Traced { trace_id, result } = run_agent(state, agent, &payload.agent_input()).await;

    let response = match result {
        Ok(RunResult { final_output, .. }) => OrchestrationResponse {
            status: "success".to_string(),
            response: Some(final_output),
            guardrail_triggered: Some(false),
            trace_id: Some(trace_id),
            ..Default::default()
        },
        Err(e @ AppError::GuardrailTriggered { .. }) => {
            tracing::info!(agent = %agent.name, trace_id = %trace_id, "request blocked: {}", e);
            OrchestrationResponse {
                status: "blocked".to_string(),
                response: Some(e.to_string()),
                guardrail_triggered: Some(true),
                trace_id: Some(trace_id),
                ..Default::default()
            }
        }
        Err(e) => return Err(e),
    };

    Ok(Json(response))
}

/// Recent workflow traces, newest first
#[utoipa::path(
    get,
    path = "/agents/orchestration/trace-status",
    params(TraceQuery),
    responses(
        (status = 200, description = "Recent traces", body = TraceStatusResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn trace_status(
    State(state): State<AppState>,
    Query(query): Query<TraceQuery>,
) -> Json<TraceStatusResponse> {
    let traces = state.traces.recent(query.limit.unwrap_or(DEFAULT_TRACE_LIMIT));

    Json(TraceStatusResponse {
        status: "success".to_string(),
        count: traces.len(),
        traces,
    })
}

/// One trace by id
#[utoipa::path(
    get,
    path = "/agents/orchestration/trace-status/{trace_id}",
    params(("trace_id" = String, Path, description = "Trace id returned by an orchestration call")),
    responses(
        (status = 200, description = "Trace", body = TraceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown trace")
    ),
    tag = "orchestration",
    security(("api_key" = []))
)]
pub async fn trace_by_id(
    State(state): State<AppState>,
    Path(trace_id): Path<String>,
) -> Result<Json<TraceRecord>> {
    state
        .traces
        .get(&trace_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Trace '{}' not found", trace_id)))
}
