//! API request handlers.
//!
//! Every agent or pipeline run goes through [`run_agent`] or [`run_pipeline`],
//! which wrap the run in a workflow span and store its trace.

/// Generic lifecycle, dynamic prompt and streaming handlers.
pub mod basic;
/// Root and health handlers.
pub mod health;
/// Hello agent and deterministic flow handlers.
pub mod hello;
/// Orchestration handlers (handoffs, combined flow, guardrails, traces).
pub mod orchestration;
/// Direct provider calls and model recommendation.
pub mod providers;
/// Story outline handlers.
pub mod story;

use crate::agents::{Agent, RunResult};
use crate::tracing_store::TraceCollector;
use crate::types::Result;
use crate::workflows::{Pipeline, WorkflowOutput};
use crate::AppState;
use std::sync::Arc;
use tracing::Instrument;

/// A finished run together with the id of its stored trace
pub(crate) struct Traced<T> {
    pub trace_id: String,
    pub result: Result<T>,
}

pub(crate) async fn run_agent(state: &AppState, agent: &Arc<Agent>, input: &str) -> Traced<RunResult> {
    let collector = TraceCollector::new(&agent.name);
    let trace_id = collector.trace_id().to_string();
    let span = collector.span();

    let result = state
        .runner
        .run(agent, input, &collector)
        .instrument(span)
        .await;

    state.traces.push(collector.finish(&result));
    Traced { trace_id, result }
}

pub(crate) async fn run_pipeline(
    state: &AppState,
    pipeline: &Pipeline,
    input: &str,
) -> Traced<WorkflowOutput> {
    let collector = TraceCollector::new(pipeline.name());
    let trace_id = collector.trace_id().to_string();
    let span = collector.span();

    let result = pipeline
        .run(&state.runner, input, &collector)
        .instrument(span)
        .await;

    state.traces.push(collector.finish(&result));
    Traced { trace_id, result }
}
