//! Agents and the agent run loop
//!
//! An [`Agent`] is plain configuration: a name, instructions, the tools it may
//! call and the agents it may hand off to. The [`Runner`] executes an agent
//! against an [`LLMClient`](crate::llm::LLMClient) and the shared
//! [`ToolRegistry`](crate::tools::ToolRegistry).
//!
//! # Module Structure
//!
//! - [`runner`] - the tool-calling loop with handoffs and guardrails
//! - [`guardrails`] - input/output checks that can stop a run
//! - [`hooks`] - lifecycle callbacks used for tracing
//! - [`router`] - matching free-text model output to an agent name
//! - [`catalog`] - the prebuilt agents served by the API
//! - [`dynamic`] - the runtime-replaceable system prompt

pub mod catalog;
pub mod dynamic;
pub mod guardrails;
pub mod hooks;
pub mod router;
pub mod runner;

use guardrails::Guardrail;
use std::fmt;
use std::sync::Arc;

pub use dynamic::DynamicPrompt;
pub use hooks::{NoopHooks, RunHooks};
pub use runner::{RunResult, Runner, ToolInvocation};

/// What the runner does after a tool call succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolUseBehavior {
    /// Feed tool output back to the model and let it answer
    #[default]
    RunLlmAgain,
    /// Use the first successful tool output as the final answer
    StopOnFirstTool,
}

/// Agent configuration
#[derive(Clone, Default)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    /// Names of registry tools this agent may call
    pub tools: Vec<String>,
    pub handoffs: Vec<Arc<Agent>>,
    /// Shown to a delegating agent in the handoff tool description
    pub handoff_description: Option<String>,
    pub model: Option<String>,
    pub input_guardrails: Vec<Arc<dyn Guardrail>>,
    pub output_guardrails: Vec<Arc<dyn Guardrail>>,
    pub tool_use_behavior: ToolUseBehavior,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_handoffs(mut self, handoffs: Vec<Arc<Agent>>) -> Self {
        self.handoffs = handoffs;
        self
    }

    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_input_guardrails(mut self, guardrails: Vec<Arc<dyn Guardrail>>) -> Self {
        self.input_guardrails = guardrails;
        self
    }

    pub fn with_output_guardrails(mut self, guardrails: Vec<Arc<dyn Guardrail>>) -> Self {
        self.output_guardrails = guardrails;
        self
    }

    pub fn stop_on_first_tool(mut self) -> Self {
        self.tool_use_behavior = ToolUseBehavior::StopOnFirstTool;
        self
    }

    /// Name of the tool a delegating agent calls to hand off to this one
    pub fn handoff_tool_name(&self) -> String {
        format!("transfer_to_{}", snake_case(&self.name))
    }

    /// Find a handoff target by its transfer tool name
    pub fn handoff_by_tool(&self, tool_name: &str) -> Option<&Arc<Agent>> {
        self.handoffs
            .iter()
            .find(|target| target.handoff_tool_name() == tool_name)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("tools", &self.tools)
            .field(
                "handoffs",
                &self.handoffs.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(),
            )
            .field("model", &self.model)
            .field("input_guardrails", &self.input_guardrails.len())
            .field("output_guardrails", &self.output_guardrails.len())
            .field("tool_use_behavior", &self.tool_use_behavior)
            .finish()
    }
}

/// `StoryAgent` -> `story_agent`, `Fairy Tale Writer` -> `fairy_tale_writer`
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if c.is_uppercase() && prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }

    out.trim_end_matches('_').to_string()
}
