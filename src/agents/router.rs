use crate::agents::Agent;
use std::sync::Arc;

/// Parse a routing decision from free-text model output
///
/// Candidates are compared case-insensitively. This handles various output formats:
/// - Clean output: "mystery"
/// - With whitespace: "  mystery  "
/// - With extra text: "I would route this to mystery"
/// - Punctuated: "route: mystery."
///
/// A candidate must appear as a whole word; "mystery_writers" does not name
/// "mystery_writer". Returns the index of the matched candidate.
pub fn parse_routing_decision(output: &str, candidates: &[&str]) -> Option<usize> {
    let trimmed = output.trim().to_lowercase();
    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();

    // First, try exact match
    if let Some(i) = lowered.iter().position(|c| *c == trimmed) {
        return Some(i);
    }

    // Anything but an identifier character separates words
    trimmed
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .find_map(|word| lowered.iter().position(|c| c == word))
}

/// Resolve a text answer naming one of `agent`'s handoff targets
///
/// Each target is known by its name, its snake_case name and its transfer tool
/// name.
pub fn match_handoff_target(agent: &Agent, output: &str) -> Option<Arc<Agent>> {
    if agent.handoffs.is_empty() {
        return None;
    }

    let mut names: Vec<String> = Vec::with_capacity(agent.handoffs.len() * 3);
    let mut owners: Vec<usize> = Vec::with_capacity(names.capacity());
    for (i, target) in agent.handoffs.iter().enumerate() {
        for name in [
            target.handoff_tool_name(),
            target.name.clone(),
            super::snake_case(&target.name),
        ] {
            names.push(name);
            owners.push(i);
        }
    }

    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    match parse_routing_decision(output, &refs) {
        Some(i) => Some(agent.handoffs[owners[i]].clone()),
        None => {
            tracing::debug!(
                agent = %agent.name,
                "Router could not parse output '{}' as a handoff",
                output
            );
            None
        }
    }
}
