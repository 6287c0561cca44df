use crate::agents::catalog;
use crate::workflows::pipeline::Pipeline;

/// Outline, story body, ending: three tool calls, no model involved
pub fn deterministic_story() -> Pipeline {
    Pipeline::new("Deterministic Story Flow")
        .tool("generate_outline", "topic")
        .tool("generate_story", "outline")
        .tool("generate_ending", "story")
}

/// Outline agent followed by the story body agent
pub fn advanced_story() -> Pipeline {
    Pipeline::new("Advanced Story Flow")
        .agent(catalog::advanced_outline())
        .agent(catalog::advanced_story_body())
}

/// Deterministic outline, then the genre triage agent hands the outline to one writer
pub fn combined_story() -> Pipeline {
    Pipeline::new("Combined Story Flow")
        .tool("generate_outline", "topic")
        .agent(catalog::genre_triage())
}
