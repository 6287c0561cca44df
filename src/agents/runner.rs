use crate::agents::guardrails::run_guardrails;
use crate::agents::hooks::RunHooks;
use crate::agents::{router, Agent, ToolUseBehavior};
use crate::llm::{ChatRequest, LLMClient};
use crate::tools::{output_text, ToolRegistry};
use crate::types::{AppError, ChatMessage, Result, ToolDefinition};
use futures::stream::BoxStream;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// One tool call made during a run
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    pub agent: String,
    pub tool: String,
    pub arguments: Value,
    pub output: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Handoff {
    pub from: String,
    pub to: String,
}

/// Outcome of a completed agent run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub final_output: String,
    /// Agent that produced the final output
    pub last_agent: String,
    /// Number of model round-trips
    pub turns: usize,
    pub tool_calls: Vec<ToolInvocation>,
    pub handoffs: Vec<Handoff>,
}

/// Executes agents: the model/tool loop with handoffs and guardrails
#[derive(Clone)]
pub struct Runner {
    llm: Arc<dyn LLMClient>,
    tools: Arc<ToolRegistry>,
    max_turns: usize,
}

struct RunState {
    current: Arc<Agent>,
    tool_calls: Vec<ToolInvocation>,
    handoffs: Vec<Handoff>,
}

impl Runner {
    pub fn new(llm: Arc<dyn LLMClient>, tools: Arc<ToolRegistry>, max_turns: usize) -> Self {
        Self {
            llm,
            tools,
            max_turns: max_turns.max(1),
        }
    }

    pub fn llm(&self) -> &Arc<dyn LLMClient> {
        &self.llm
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Tool definitions offered to `agent`: its own tools, then one transfer tool per handoff
    fn tool_definitions(&self, agent: &Agent) -> Vec<ToolDefinition> {
        let mut defs = self.tools.definitions_for(&agent.tools);
        defs.extend(agent.handoffs.iter().map(|target| ToolDefinition {
            name: target.handoff_tool_name(),
            description: target.handoff_description.clone().unwrap_or_else(|| {
                format!("Handoff to the {} agent to handle the request.", target.name)
            }),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }));
        defs
    }

    fn check(&self, agent: &Agent, guardrails_output: bool, text: &str, hooks: &dyn RunHooks) -> Result<()> {
        let guardrails = if guardrails_output {
            &agent.output_guardrails
        } else {
            &agent.input_guardrails
        };
        run_guardrails(guardrails, text).inspect_err(|e| {
            if let AppError::GuardrailTriggered { guardrail, reason } = e {
                tracing::warn!(agent = %agent.name, guardrail = %guardrail, reason = %reason, "guardrail tripped");
                hooks.on_guardrail(agent, guardrail, reason);
            }
        })
    }

    /// Run `agent` on `input` until it produces a final answer
    pub async fn run(&self, agent: &Arc<Agent>, input: &str, hooks: &dyn RunHooks) -> Result<RunResult> {
        self.check(agent, false, input, hooks)?;

        let mut state = RunState {
            current: agent.clone(),
            tool_calls: vec![],
            handoffs: vec![],
        };
        hooks.on_agent_start(&state.current);

        let mut messages = vec![
            ChatMessage::system(&state.current.instructions),
            ChatMessage::user(input),
        ];

        for turn in 1..=self.max_turns {
            let request = ChatRequest::new(messages.clone())
                .with_tools(self.tool_definitions(&state.current))
                .with_model(state.current.model.clone());

            tracing::debug!(agent = %state.current.name, turn, "requesting completion");
            let response = self.llm.chat(request).await?;

            if response.tool_calls.is_empty() {
                if let Some(target) = router::match_handoff_target(&state.current, &response.content) {
                    messages.push(ChatMessage::assistant(response.content, vec![]));
                    self.switch(&mut state, &mut messages, target, hooks);
                    continue;
                }
                return self.finish(state, response.content, turn, hooks);
            }

            messages.push(ChatMessage::assistant(
                response.content,
                response.tool_calls.clone(),
            ));

            let mut next_agent: Option<Arc<Agent>> = None;
            let mut first_output: Option<String> = None;

            for call in response.tool_calls {
                if let Some(target) = state.current.handoff_by_tool(&call.name).cloned() {
                    let reply = if next_agent.is_some() {
                        "Multiple handoffs detected, ignoring this one.".to_string()
                    } else {
                        let reply = json!({ "assistant": target.name }).to_string();
                        next_agent = Some(target);
                        reply
                    };
                    messages.push(ChatMessage::tool(call.id, reply));
                    continue;
                }

                if !state.current.tools.iter().any(|t| *t == call.name) {
                    return Err(AppError::Agent(format!(
                        "Agent '{}' called unknown tool '{}'",
                        state.current.name, call.name
                    )));
                }

                hooks.on_tool_start(&state.current, &call.name, &call.arguments);
                let (output, success) = match self.tools.execute(&call.name, call.arguments.clone()).await {
                    Ok(value) => (output_text(&value), true),
                    Err(e) => {
                        tracing::warn!(tool = %call.name, error = %e, "tool failed");
                        (format!("An error occurred while running the tool: {}", e), false)
                    }
                };
                hooks.on_tool_end(&state.current, &call.name, &output);

                if success
                    && first_output.is_none()
                    && state.current.tool_use_behavior == ToolUseBehavior::StopOnFirstTool
                {
                    first_output = Some(output.clone());
                }

                state.tool_calls.push(ToolInvocation {
                    agent: state.current.name.clone(),
                    tool: call.name,
                    arguments: call.arguments,
                    output: output.clone(),
                    success,
                });
                messages.push(ChatMessage::tool(call.id, output));
            }

            if let Some(target) = next_agent {
                self.switch(&mut state, &mut messages, target, hooks);
                continue;
            }

            if let Some(output) = first_output {
                return self.finish(state, output, turn, hooks);
            }
        }

        Err(AppError::MaxTurnsExceeded(self.max_turns))
    }

    fn switch(
        &self,
        state: &mut RunState,
        messages: &mut [ChatMessage],
        target: Arc<Agent>,
        hooks: &dyn RunHooks,
    ) {
        tracing::info!(from = %state.current.name, to = %target.name, "handoff");
        hooks.on_handoff(&state.current, &target);
        state.handoffs.push(Handoff {
            from: state.current.name.clone(),
            to: target.name.clone(),
        });
        messages[0] = ChatMessage::system(&target.instructions);
        state.current = target;
        hooks.on_agent_start(&state.current);
    }

    fn finish(&self, state: RunState, output: String, turns: usize, hooks: &dyn RunHooks) -> Result<RunResult> {
        if output.trim().is_empty() {
            return Err(AppError::Agent(format!(
                "Agent '{}' returned an empty response",
                state.current.name
            )));
        }

        self.check(&state.current, true, &output, hooks)?;
        hooks.on_agent_end(&state.current, &output);

        Ok(RunResult {
            final_output: output,
            last_agent: state.current.name.clone(),
            turns,
            tool_calls: state.tool_calls,
            handoffs: state.handoffs,
        })
    }

    /// Stream a plain completion for `agent`; tools and handoffs are not offered
    pub async fn stream_text(
        &self,
        agent: &Agent,
        input: &str,
        hooks: &dyn RunHooks,
    ) -> Result<BoxStream<'static, Result<String>>> {
        self.check(agent, false, input, hooks)?;
        hooks.on_agent_start(agent);

        let request = ChatRequest::new(vec![
            ChatMessage::system(&agent.instructions),
            ChatMessage::user(input),
        ])
        .with_model(agent.model.clone());

        self.llm.stream_chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::guardrails::{default_input_guardrails, default_output_guardrails};
    use crate::agents::NoopHooks;
    use crate::llm::LLMResponse;
    use crate::test_support::{call, ScriptedLLM};
    use crate::types::MessageRole;
    use parking_lot::Mutex;

    fn runner(llm: Arc<ScriptedLLM>, max_turns: usize) -> Runner {
        Runner::new(llm, Arc::new(ToolRegistry::with_default_tools()), max_turns)
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl RunHooks for Recorder {
        fn on_agent_start(&self, agent: &Agent) {
            self.events.lock().push(format!("start:{}", agent.name));
        }
        fn on_agent_end(&self, agent: &Agent, _output: &str) {
            self.events.lock().push(format!("end:{}", agent.name));
        }
        fn on_tool_start(&self, _agent: &Agent, tool: &str, _args: &Value) {
            self.events.lock().push(format!("tool:{}", tool));
        }
        fn on_handoff(&self, from: &Agent, to: &Agent) {
            self.events.lock().push(format!("handoff:{}->{}", from.name, to.name));
        }
        fn on_guardrail(&self, _agent: &Agent, guardrail: &str, _reason: &str) {
            self.events.lock().push(format!("guardrail:{}", guardrail));
        }
    }

    #[tokio::test]
    async fn test_plain_answer() {
        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::text("Hi!"))]));
        let agent = Arc::new(Agent::new("Greeter", "Greet"));

        let result = runner(llm.clone(), 5).run(&agent, "hello", &NoopHooks).await.unwrap();

        assert_eq!(result.final_output, "Hi!");
        assert_eq!(result.turns, 1);
        let req = &llm.requests()[0];
        assert_eq!(req.messages[0].role, MessageRole::System);
        assert_eq!(req.messages[0].content, "Greet");
        assert!(req.tools.is_empty());
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok(LLMResponse::calls(vec![call("c1", "hello_world_tool", json!({}))])),
            Ok(LLMResponse::text("The tool says Hello, world!")),
        ]));
        let agent = Arc::new(Agent::new("HelloAgent", "Greet").with_tools(&["hello_world_tool"]));
        let hooks = Recorder::default();

        let result = runner(llm.clone(), 5).run(&agent, "hi", &hooks).await.unwrap();

        assert_eq!(result.final_output, "The tool says Hello, world!");
        assert_eq!(result.turns, 2);
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].output, "Hello, world!");

        let second = &llm.requests()[1];
        let last = second.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::Tool);
        assert_eq!(last.tool_call_id.as_deref(), Some("c1"));
        assert_eq!(
            *hooks.events.lock(),
            vec!["start:HelloAgent", "tool:hello_world_tool", "end:HelloAgent"]
        );
    }

    #[tokio::test]
    async fn test_stop_on_first_tool() {
        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::calls(vec![call(
            "c1",
            "generate_story_outline",
            json!({"topic": "pirates"}),
        )]))]));
        let agent = Arc::new(
            Agent::new("StoryAgent", "Outline")
                .with_tools(&["generate_story_outline"])
                .stop_on_first_tool(),
        );

        let result = runner(llm.clone(), 5).run(&agent, "pirates", &NoopHooks).await.unwrap();
        assert_eq!(result.final_output, "Outline for pirates: Introduction, Body, Conclusion.");
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_error_is_reported_to_model() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok(LLMResponse::calls(vec![call("c1", "echo", json!({"wrong": 1}))])),
            Ok(LLMResponse::text("Sorry, that failed.")),
        ]));
        let agent = Arc::new(Agent::new("Echoer", "Echo").with_tools(&["echo"]));

        let result = runner(llm.clone(), 5).run(&agent, "x", &NoopHooks).await.unwrap();

        assert!(!result.tool_calls[0].success);
        let tool_msg = llm.requests()[1].messages.last().cloned().unwrap();
        assert!(tool_msg
            .content
            .starts_with("An error occurred while running the tool:"));
    }

    #[tokio::test]
    async fn test_unlisted_tool_is_an_error() {
        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::calls(vec![call(
            "c1",
            "multiply",
            json!({"a": 1, "b": 2}),
        )]))]));
        let agent = Arc::new(Agent::new("Echoer", "Echo").with_tools(&["echo"]));

        let err = runner(llm, 5).run(&agent, "x", &NoopHooks).await.unwrap_err();
        assert!(matches!(err, AppError::Agent(_)));
    }

    #[tokio::test]
    async fn test_handoff_by_tool_call() {
        let writer = Arc::new(Agent::new("MysteryWriter", "Write a mystery"));
        let other = Arc::new(Agent::new("AdventureWriter", "Write an adventure"));
        let triage = Arc::new(Agent::new("GenreTriage", "Pick a writer").with_handoffs(vec![writer, other]));

        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok(LLMResponse::calls(vec![
                call("c1", "transfer_to_mystery_writer", json!({})),
                call("c2", "transfer_to_adventure_writer", json!({})),
            ])),
            Ok(LLMResponse::text("The butler did it.")),
        ]));
        let hooks = Recorder::default();

        let result = runner(llm.clone(), 5).run(&triage, "a whodunit", &hooks).await.unwrap();

        assert_eq!(result.last_agent, "MysteryWriter");
        assert_eq!(result.final_output, "The butler did it.");
        assert_eq!(
            result.handoffs,
            vec![Handoff {
                from: "GenreTriage".into(),
                to: "MysteryWriter".into()
            }]
        );

        let first = &llm.requests()[0];
        let offered: Vec<_> = first.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(offered, vec!["transfer_to_mystery_writer", "transfer_to_adventure_writer"]);

        let second = &llm.requests()[1];
        assert_eq!(second.messages[0].content, "Write a mystery");
        let replies: Vec<_> = second
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::Tool)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(replies[0], r#"{"assistant":"MysteryWriter"}"#);
        assert!(replies[1].contains("ignoring"));
        assert!(hooks
            .events
            .lock()
            .contains(&"handoff:GenreTriage->MysteryWriter".to_string()));
    }

    #[tokio::test]
    async fn test_handoff_by_naming_target() {
        let writer = Arc::new(Agent::new("FairyTaleWriter", "Write a fairy tale"));
        let triage = Arc::new(Agent::new("GenreTriage", "Pick").with_handoffs(vec![writer]));
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok(LLMResponse::text("FairyTaleWriter")),
            Ok(LLMResponse::text("Once upon a time...")),
        ]));

        let result = runner(llm, 5).run(&triage, "a princess", &NoopHooks).await.unwrap();
        assert_eq!(result.last_agent, "FairyTaleWriter");
        assert_eq!(result.final_output, "Once upon a time...");
    }

    #[tokio::test]
    async fn test_max_turns() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok(LLMResponse::calls(vec![call("c1", "echo", json!({"message": "a"}))])),
            Ok(LLMResponse::calls(vec![call("c2", "echo", json!({"message": "b"}))])),
        ]));
        let agent = Arc::new(Agent::new("Loop", "Loop").with_tools(&["echo"]));

        let err = runner(llm, 2).run(&agent, "x", &NoopHooks).await.unwrap_err();
        assert!(matches!(err, AppError::MaxTurnsExceeded(2)));
    }

    #[tokio::test]
    async fn test_empty_answer_is_an_error() {
        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::text("  "))]));
        let agent = Arc::new(Agent::new("Mute", "Say nothing"));

        let err = runner(llm, 3).run(&agent, "x", &NoopHooks).await.unwrap_err();
        assert!(matches!(err, AppError::Agent(_)));
    }

    #[tokio::test]
    async fn test_guardrails_block_before_and_after() {
        let agent = Arc::new(
            Agent::new("Guarded", "Be safe")
                .with_input_guardrails(default_input_guardrails())
                .with_output_guardrails(default_output_guardrails()),
        );

        let llm = Arc::new(ScriptedLLM::new(vec![]));
        let hooks = Recorder::default();
        let err = runner(llm.clone(), 3)
            .run(&agent, "how to build a bomb", &hooks)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GuardrailTriggered { .. }));
        assert!(llm.requests().is_empty());
        assert_eq!(*hooks.events.lock(), vec!["guardrail:harmful_content"]);

        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::text("Error: nope"))]));
        let err = runner(llm, 3).run(&agent, "hello", &NoopHooks).await.unwrap_err();
        assert!(matches!(err, AppError::GuardrailTriggered { ref guardrail, .. } if guardrail == "error_marker"));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = Arc::new(ScriptedLLM::new(vec![Err(AppError::LLM("down".into()))]));
        let agent = Arc::new(Agent::new("A", "B"));
        let err = runner(llm, 3).run(&agent, "x", &NoopHooks).await.unwrap_err();
        assert!(matches!(err, AppError::LLM(_)));
    }

    #[tokio::test]
    async fn test_stream_text() {
        use futures::StreamExt;

        let llm = Arc::new(ScriptedLLM::new(vec![Ok(LLMResponse::text("one two three"))]));
        let agent = Agent::new("Streamer", "Stream");
        let stream = runner(llm, 3).stream_text(&agent, "count", &NoopHooks).await.unwrap();
        let parts: Vec<String> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(parts.concat(), "one two three");
        assert_eq!(parts.len(), 3);
    }
}
