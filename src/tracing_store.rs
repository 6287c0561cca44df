//! Run traces
//!
//! A [`TraceCollector`] is handed to the runner as its [`RunHooks`]; it logs
//! each lifecycle event and keeps them. When the run finishes the collector is
//! turned into a [`TraceRecord`] and pushed into the bounded [`TraceStore`].

use crate::agents::{Agent, RunHooks};
use crate::types::AppError;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    AgentStart,
    AgentEnd,
    ToolStart,
    ToolEnd,
    Handoff,
    Guardrail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TraceEvent {
    pub kind: TraceEventKind,
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TraceStatus {
    Success,
    GuardrailTriggered,
    Error,
}

/// A finished run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TraceRecord {
    pub trace_id: String,
    pub workflow: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: TraceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<TraceEvent>,
}

/// Collects lifecycle events for one workflow run
pub struct TraceCollector {
    trace_id: String,
    workflow: String,
    started_at: DateTime<Utc>,
    started: Instant,
    events: Mutex<Vec<TraceEvent>>,
}

impl TraceCollector {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            workflow: workflow.into(),
            started_at: Utc::now(),
            started: Instant::now(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Span to run the workflow in
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("workflow", name = %self.workflow, trace_id = %self.trace_id)
    }

    fn record(&self, kind: TraceEventKind, agent: &str, detail: Option<String>) {
        self.events.lock().push(TraceEvent {
            kind,
            agent: agent.to_string(),
            detail,
            at: Utc::now(),
        });
    }

    /// Close the trace with the run's outcome
    pub fn finish<T>(self, outcome: &Result<T, AppError>) -> TraceRecord {
        self.close(outcome.as_ref().err())
    }

    /// Close the trace; `None` means the run succeeded
    pub fn close(self, error: Option<&AppError>) -> TraceRecord {
        let (status, error) = match error {
            None => (TraceStatus::Success, None),
            Some(e @ AppError::GuardrailTriggered { .. }) => {
                (TraceStatus::GuardrailTriggered, Some(e.to_string()))
            }
            Some(e) => (TraceStatus::Error, Some(e.to_string())),
        };

        TraceRecord {
            trace_id: self.trace_id,
            workflow: self.workflow,
            started_at: self.started_at,
            duration_ms: self.started.elapsed().as_millis() as u64,
            status,
            error,
            events: self.events.into_inner(),
        }
    }
}

impl RunHooks for TraceCollector {
    fn on_agent_start(&self, agent: &Agent) {
        tracing::info!("[START] Agent: {}", agent.name);
        self.record(TraceEventKind::AgentStart, &agent.name, None);
    }

    fn on_agent_end(&self, agent: &Agent, output: &str) {
        tracing::info!("[END] Agent: {} ({} chars)", agent.name, output.chars().count());
        self.record(TraceEventKind::AgentEnd, &agent.name, None);
    }

    fn on_tool_start(&self, agent: &Agent, tool: &str, args: &Value) {
        tracing::info!("[TOOL START] {} -> {} {}", agent.name, tool, args);
        self.record(TraceEventKind::ToolStart, &agent.name, Some(tool.to_string()));
    }

    fn on_tool_end(&self, agent: &Agent, tool: &str, output: &str) {
        tracing::info!("[TOOL END] {} -> {}", agent.name, tool);
        tracing::debug!(output = %output, "tool output");
        self.record(TraceEventKind::ToolEnd, &agent.name, Some(tool.to_string()));
    }

    fn on_handoff(&self, from: &Agent, to: &Agent) {
        tracing::info!("[HANDOFF] {} -> {}", from.name, to.name);
        self.record(TraceEventKind::Handoff, &from.name, Some(to.name.clone()));
    }

    fn on_guardrail(&self, agent: &Agent, guardrail: &str, reason: &str) {
        tracing::info!("[GUARDRAIL] {}: {} ({})", agent.name, guardrail, reason);
        self.record(
            TraceEventKind::Guardrail,
            &agent.name,
            Some(format!("{}: {}", guardrail, reason)),
        );
    }
}

/// Bounded in-memory store of finished traces, oldest evicted first
pub struct TraceStore {
    capacity: usize,
    records: RwLock<VecDeque<TraceRecord>>,
}

impl TraceStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    pub fn push(&self, record: TraceRecord) {
        let mut records = self.records.write();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Newest first
    pub fn recent(&self, limit: usize) -> Vec<TraceRecord> {
        self.records.read().iter().rev().take(limit).cloned().collect()
    }

    pub fn get(&self, trace_id: &str) -> Option<TraceRecord> {
        self.records
            .read()
            .iter()
            .find(|r| r.trace_id == trace_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finished(workflow: &str) -> TraceRecord {
        TraceCollector::new(workflow).finish(&Ok::<(), AppError>(()))
    }

    #[test]
    fn test_collector_records_events() {
        let collector = TraceCollector::new("handoffs");
        let triage = Agent::new("TriageAgent", "");
        let math = Agent::new("MathAgent", "");

        collector.on_agent_start(&triage);
        collector.on_handoff(&triage, &math);
        collector.on_agent_start(&math);
        collector.on_tool_start(&math, "add", &json!({"a": 1, "b": 2}));
        collector.on_tool_end(&math, "add", "3");
        collector.on_agent_end(&math, "3");

        let record = collector.finish(&Ok::<(), AppError>(()));
        let kinds: Vec<_> = record.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TraceEventKind::AgentStart,
                TraceEventKind::Handoff,
                TraceEventKind::AgentStart,
                TraceEventKind::ToolStart,
                TraceEventKind::ToolEnd,
                TraceEventKind::AgentEnd,
            ]
        );
        assert_eq!(record.events[1].detail.as_deref(), Some("MathAgent"));
        assert_eq!(record.status, TraceStatus::Success);
        assert!(Uuid::parse_str(&record.trace_id).is_ok());
    }

    #[test]
    fn test_finish_status() {
        let guard: Result<(), AppError> = Err(AppError::GuardrailTriggered {
            guardrail: "empty_text".into(),
            reason: "text is empty".into(),
        });
        let record = TraceCollector::new("g").finish(&guard);
        assert_eq!(record.status, TraceStatus::GuardrailTriggered);

        let failed: Result<(), AppError> = Err(AppError::LLM("down".into()));
        let record = TraceCollector::new("f").finish(&failed);
        assert_eq!(record.status, TraceStatus::Error);
        assert!(record.error.unwrap().contains("down"));
    }

    #[test]
    fn test_store_is_bounded_and_newest_first() {
        let store = TraceStore::new(2);
        let first = finished("one");
        let first_id = first.trace_id.clone();
        store.push(first);
        store.push(finished("two"));
        store.push(finished("three"));

        assert_eq!(store.len(), 2);
        assert!(store.get(&first_id).is_none());

        let names: Vec<_> = store.recent(10).into_iter().map(|r| r.workflow).collect();
        assert_eq!(names, vec!["three", "two"]);
        assert_eq!(store.recent(1).len(), 1);
    }
}
