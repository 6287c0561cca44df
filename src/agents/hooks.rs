use crate::agents::Agent;
use serde_json::Value;

/// Lifecycle callbacks invoked by the [`Runner`](crate::agents::Runner)
///
/// All methods default to no-ops. Callbacks are synchronous and must not block.
pub trait RunHooks: Send + Sync {
    fn on_agent_start(&self, _agent: &Agent) {}

    fn on_agent_end(&self, _agent: &Agent, _output: &str) {}

    fn on_tool_start(&self, _agent: &Agent, _tool: &str, _args: &Value) {}

    fn on_tool_end(&self, _agent: &Agent, _tool: &str, _output: &str) {}

    fn on_handoff(&self, _from: &Agent, _to: &Agent) {}

    fn on_guardrail(&self, _agent: &Agent, _guardrail: &str, _reason: &str) {}
}

/// Hooks that do nothing
pub struct NoopHooks;

impl RunHooks for NoopHooks {}
