//! Story-writing tools: outlines, story bodies and endings.

use crate::tools::registry::{parse_args, Tool};
use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Three-part outline passed between story tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOutline {
    pub introduction: String,
    pub body: String,
    pub conclusion: String,
}

impl StoryOutline {
    /// Outline used by the advanced story agents
    pub fn advanced(topic: &str) -> Self {
        Self {
            introduction: format!(
                "Introduction for '{}': Begin with an evocative setting and compelling characters.",
                topic
            ),
            body: format!(
                "Body for '{}': Develop the conflict and outline the journey with dynamic events.",
                topic
            ),
            conclusion: format!(
                "Conclusion for '{}': Resolve the conflict with a memorable and thoughtful ending.",
                topic
            ),
        }
    }

    /// Outline used by the deterministic story flow
    pub fn simple(topic: &str) -> Self {
        Self {
            introduction: format!(
                "Introduction for {}: Introduce main character and setting.",
                topic
            ),
            body: format!(
                "Body for {}: Character faces a challenge or goes on an adventure.",
                topic
            ),
            conclusion: format!(
                "Conclusion for {}: Resolution of the challenge and character's fate.",
                topic
            ),
        }
    }

    fn joined(parts: &[&str]) -> String {
        parts
            .iter()
            .filter(|p| !p.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Outline argument: a structured outline, or text (possibly a JSON-encoded outline)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OutlineArg {
    Structured(StoryOutline),
    Text(String),
}

impl From<OutlineArg> for StoryOutline {
    fn from(arg: OutlineArg) -> Self {
        match arg {
            OutlineArg::Structured(outline) => outline,
            OutlineArg::Text(text) => serde_json::from_str(&text).unwrap_or(StoryOutline {
                introduction: text,
                body: String::new(),
                conclusion: String::new(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct TopicArgs {
    topic: String,
}

#[derive(Deserialize)]
struct OutlineArgs {
    outline: OutlineArg,
}

fn topic_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "topic": { "type": "string", "description": "Story topic" }
        },
        "required": ["topic"]
    })
}

fn outline_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "outline": {
                "type": "object",
                "properties": {
                    "introduction": { "type": "string" },
                    "body": { "type": "string" },
                    "conclusion": { "type": "string" }
                },
                "required": ["introduction", "body", "conclusion"]
            }
        },
        "required": ["outline"]
    })
}

pub struct BaselineOutline;

#[async_trait]
impl Tool for BaselineOutline {
    fn name(&self) -> &str {
        "generate_story_outline"
    }

    fn description(&self) -> &str {
        "Generate a basic story outline for a topic"
    }

    fn parameters_schema(&self) -> Value {
        topic_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: TopicArgs = parse_args(self.name(), args)?;
        Ok(json!(format!(
            "Outline for {}: Introduction, Body, Conclusion.",
            args.topic
        )))
    }
}

pub struct CustomOutline;

#[async_trait]
impl Tool for CustomOutline {
    fn name(&self) -> &str {
        "generate_custom_outline"
    }

    fn description(&self) -> &str {
        "Generate a detailed four-part story outline for a topic"
    }

    fn parameters_schema(&self) -> Value {
        topic_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: TopicArgs = parse_args(self.name(), args)?;
        Ok(json!(format!(
            "Custom Story Outline for '{}':\n\
             1. **Introduction:** Set stage with vivid imagery and mood.\n\
             2. **Conflict:** Present a compelling challenge or dilemma.\n\
             3. **Climax:** Build suspense with dynamic, unexpected turns.\n\
             4. **Conclusion:** Deliver a satisfying resolution that inspires reflection.",
            args.topic
        )))
    }
}

pub struct AdvancedOutline;

#[async_trait]
impl Tool for AdvancedOutline {
    fn name(&self) -> &str {
        "generate_advanced_outline"
    }

    fn description(&self) -> &str {
        "Generate a structured outline with introduction, body and conclusion"
    }

    fn parameters_schema(&self) -> Value {
        topic_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: TopicArgs = parse_args(self.name(), args)?;
        Ok(json!(StoryOutline::advanced(&args.topic)))
    }
}

pub struct AdvancedStoryBody;

#[async_trait]
impl Tool for AdvancedStoryBody {
    fn name(&self) -> &str {
        "generate_advanced_story_body"
    }

    fn description(&self) -> &str {
        "Expand a structured outline into the story text"
    }

    fn parameters_schema(&self) -> Value {
        outline_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: OutlineArgs = parse_args(self.name(), args)?;
        let outline = StoryOutline::from(args.outline);
        Ok(json!(StoryOutline::joined(&[
            &outline.introduction,
            &outline.body,
            &outline.conclusion,
        ])))
    }
}

pub struct GenerateOutline;

#[async_trait]
impl Tool for GenerateOutline {
    fn name(&self) -> &str {
        "generate_outline"
    }

    fn description(&self) -> &str {
        "Generate a story outline for a topic"
    }

    fn parameters_schema(&self) -> Value {
        topic_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: TopicArgs = parse_args(self.name(), args)?;
        Ok(json!(StoryOutline::simple(&args.topic)))
    }
}

pub struct GenerateStory;

#[async_trait]
impl Tool for GenerateStory {
    fn name(&self) -> &str {
        "generate_story"
    }

    fn description(&self) -> &str {
        "Write the opening of a story from an outline"
    }

    fn parameters_schema(&self) -> Value {
        outline_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: OutlineArgs = parse_args(self.name(), args)?;
        let outline = StoryOutline::from(args.outline);
        Ok(json!(StoryOutline::joined(&[&outline.introduction, &outline.body])))
    }
}

#[derive(Deserialize)]
struct StoryArgs {
    story: String,
}

pub struct GenerateEnding;

#[async_trait]
impl Tool for GenerateEnding {
    fn name(&self) -> &str {
        "generate_ending"
    }

    fn description(&self) -> &str {
        "Append an ending to a story"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "story": { "type": "string" }
            },
            "required": ["story"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: StoryArgs = parse_args(self.name(), args)?;
        Ok(json!(format!(
            "{}.\n\nAnd they all lived happily ever after. The End.",
            args.story
        )))
    }
}
