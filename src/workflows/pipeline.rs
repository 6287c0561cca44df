//! Sequential pipelines
//!
//! A pipeline is a fixed list of steps. The output of each step is the input
//! of the next; there is no branching.

use crate::agents::{Agent, RunHooks, Runner};
use crate::tools::output_text;
use crate::types::{with_context, AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

/// Output from a workflow execution
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkflowOutput {
    /// The final response from the workflow
    pub final_response: String,
    /// Number of steps executed
    pub steps_executed: usize,
    /// List of agent names that were used
    pub agents_used: Vec<String>,
    /// Detailed reasoning path showing each step
    pub reasoning_path: Vec<WorkflowStep>,
}

/// A single step in the workflow execution
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkflowStep {
    /// The agent or tool that executed this step
    pub agent_name: String,
    /// The input provided to the step
    pub input: String,
    /// The output from the step
    pub output: String,
    /// Unix timestamp when this step was executed
    pub timestamp: i64,
    /// Duration of this step in milliseconds
    pub duration_ms: u64,
}

#[derive(Clone)]
pub enum Step {
    /// Run an agent with the previous output as its input text
    Agent(Arc<Agent>),
    /// Call a registry tool with `{input_key: previous output}`
    Tool { tool: String, input_key: String },
}

#[derive(Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
    context: Option<String>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            context: None,
        }
    }

    /// Context appended to the input of every agent step; tool steps never see it
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn agent(mut self, agent: Arc<Agent>) -> Self {
        self.steps.push(Step::Agent(agent));
        self
    }

    pub fn tool(mut self, tool: impl Into<String>, input_key: impl Into<String>) -> Self {
        self.steps.push(Step::Tool {
            tool: tool.into(),
            input_key: input_key.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub async fn run(&self, runner: &Runner, input: &str, hooks: &dyn RunHooks) -> Result<WorkflowOutput> {
        if self.steps.is_empty() {
            return Err(AppError::Internal(format!("Pipeline '{}' has no steps", self.name)));
        }

        // Tool steps are reported to hooks under the pipeline's name
        let owner = Agent::new(&self.name, "");
        let mut carry = Value::String(input.to_string());
        let mut reasoning_path = Vec::with_capacity(self.steps.len());
        let mut agents_used: Vec<String> = Vec::new();

        for step in &self.steps {
            let started = Instant::now();
            let timestamp = Utc::now().timestamp();
            let step_input = match (step, &self.context) {
                (Step::Agent(_), Some(ctx)) => with_context(&output_text(&carry), ctx),
                _ => output_text(&carry),
            };

            let (step_name, next) = match step {
                Step::Agent(agent) => {
                    let result = runner.run(agent, &step_input, hooks).await?;
                    for handoff in &result.handoffs {
                        if !agents_used.contains(&handoff.from) {
                            agents_used.push(handoff.from.clone());
                        }
                    }
                    if !agents_used.contains(&result.last_agent) {
                        agents_used.push(result.last_agent.clone());
                    }
                    (agent.name.clone(), Value::String(result.final_output))
                }
                Step::Tool { tool, input_key } => {
                    let arg = if carry.is_object() {
                        carry.clone()
                    } else {
                        Value::String(step_input.clone())
                    };
                    let mut map = serde_json::Map::new();
                    map.insert(input_key.clone(), arg);
                    let args = Value::Object(map);

                    hooks.on_tool_start(&owner, tool, &args);
                    let value = runner.tools().execute(tool, args).await?;
                    hooks.on_tool_end(&owner, tool, &output_text(&value));
                    (tool.clone(), value)
                }
            };

            let step_output = output_text(&next);
            if step_output.trim().is_empty() || next.is_null() {
                return Err(AppError::Agent(format!(
                    "Step '{}' of '{}' produced no output",
                    step_name, self.name
                )));
            }

            tracing::debug!(pipeline = %self.name, step = %step_name, "step complete");
            reasoning_path.push(WorkflowStep {
                agent_name: step_name,
                input: step_input,
                output: step_output,
                timestamp,
                duration_ms: started.elapsed().as_millis() as u64,
            });
            carry = next;
        }

        Ok(WorkflowOutput {
            final_response: output_text(&carry),
            steps_executed: reasoning_path.len(),
            agents_used,
            reasoning_path,
        })
    }
}
