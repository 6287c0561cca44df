//! Prebuilt agents served by the API.

use crate::agents::guardrails::{default_input_guardrails, default_output_guardrails};
use crate::agents::Agent;
use std::sync::Arc;

pub fn hello() -> Arc<Agent> {
    Arc::new(
        Agent::new("HelloAgent", "You are a friendly agent that greets the user.")
            .with_tools(&["hello_world_tool"]),
    )
}

// ============= Story agents =============

pub fn baseline_story() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "BaselineStoryAgent",
            "You write story outlines. Call generate_story_outline with the topic the user gives you.",
        )
        .with_tools(&["generate_story_outline"])
        .stop_on_first_tool(),
    )
}

pub fn custom_story() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "CustomStoryAgent",
            "You create detailed, engaging story outlines. \
             Call generate_custom_outline with the topic the user gives you.",
        )
        .with_tools(&["generate_custom_outline"])
        .stop_on_first_tool(),
    )
}

pub fn advanced_outline() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "AdvancedOutlineAgent",
            "You plan stories. Call generate_advanced_outline with the topic the user gives you.",
        )
        .with_tools(&["generate_advanced_outline"])
        .stop_on_first_tool(),
    )
}

pub fn advanced_story_body() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "AdvancedStoryBodyAgent",
            "You turn outlines into stories. The user message is a JSON outline with \
             introduction, body and conclusion. Pass it unchanged as `outline` to \
             generate_advanced_story_body.",
        )
        .with_tools(&["generate_advanced_story_body"])
        .stop_on_first_tool(),
    )
}

// ============= Basic agents =============

pub fn generic_lifecycle() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "GenericLifecycleAgent",
            "You are a helpful assistant with these tools:\n\
             - echo: repeat a message\n\
             - add / multiply: arithmetic on two numbers\n\
             - to_uppercase: convert text to uppercase\n\
             - current_time: the current UTC time\n\
             - fetch_mock_data: sample data from a named source\n\
             Use the tools when they help, then answer the user.",
        )
        .with_tools(&[
            "echo",
            "add",
            "multiply",
            "to_uppercase",
            "current_time",
            "fetch_mock_data",
        ]),
    )
}

pub fn dynamic_prompt(instructions: &str) -> Arc<Agent> {
    Arc::new(Agent::new("DynamicPromptAgent", instructions))
}

pub fn stream_text() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "StreamTextAgent",
            "You are a helpful assistant. Answer clearly and concisely.",
        )
        .with_input_guardrails(default_input_guardrails()),
    )
}

// ============= Orchestration agents =============

/// Routes a request to a greeting, story or math specialist
pub fn triage() -> Arc<Agent> {
    let greeting = Arc::new(
        Agent::new(
            "GreetingAgent",
            "You greet people warmly. Use hello_world_tool, then add a short friendly sentence.",
        )
        .with_tools(&["hello_world_tool"])
        .with_handoff_description("Handles greetings and small talk."),
    );
    let story = Arc::new(
        Agent::new(
            "StoryAgent",
            "You outline stories. Call generate_story_outline with the topic from the request.",
        )
        .with_tools(&["generate_story_outline"])
        .with_handoff_description("Handles requests for stories or story outlines.")
        .stop_on_first_tool(),
    );
    let math = Arc::new(
        Agent::new(
            "MathAgent",
            "You solve arithmetic. Use add and multiply, then state the result.",
        )
        .with_tools(&["add", "multiply"])
        .with_handoff_description("Handles arithmetic questions."),
    );

    Arc::new(
        Agent::new(
            "TriageAgent",
            "You route requests. Hand off greetings to GreetingAgent, story requests to \
             StoryAgent and arithmetic to MathAgent. Always hand off; never answer yourself.",
        )
        .with_handoffs(vec![greeting, story, math]),
    )
}

/// Routes an outlined story to a genre writer
pub fn genre_triage() -> Arc<Agent> {
    let writer = |name: &str, genre: &str| {
        Arc::new(
            Agent::new(
                name,
                format!(
                    "You are a {} writer. Write a short {} story (under 300 words) that follows the outline you are given.",
                    genre, genre
                ),
            )
            .with_handoff_description(format!("Writes {} stories.", genre)),
        )
    };

    Arc::new(
        Agent::new(
            "GenreTriageAgent",
            "You receive a story topic and outline. Decide whether it is best told as an \
             adventure, a mystery or a fairy tale, and hand off to the matching writer. \
             Always hand off; never write the story yourself.",
        )
        .with_handoffs(vec![
            writer("AdventureWriter", "adventure"),
            writer("MysteryWriter", "mystery"),
            writer("FairyTaleWriter", "fairy tale"),
        ]),
    )
}

pub fn input_guarded() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "InputGuardrailAgent",
            "I am an agent with guardrails to ensure safe and compliant interactions.",
        )
        .with_input_guardrails(default_input_guardrails()),
    )
}

pub fn output_guarded() -> Arc<Agent> {
    Arc::new(
        Agent::new(
            "OutputGuardrailAgent",
            "I am an agent with guardrails to ensure safe and compliant interactions.",
        )
        .with_output_guardrails(default_output_guardrails()),
    )
}
