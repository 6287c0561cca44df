//! Input and output guardrails
//!
//! A guardrail inspects text and may trip. Input guardrails run before the
//! first model call; output guardrails run on the final answer.

use crate::types::{AppError, Result};
use std::sync::Arc;

/// Longest accepted user input, in characters
pub const MAX_INPUT_CHARS: usize = 2000;
/// Longest accepted final answer, in characters
pub const MAX_OUTPUT_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardrailOutcome {
    pub tripwire_triggered: bool,
    pub reason: Option<String>,
}

impl GuardrailOutcome {
    pub fn pass() -> Self {
        Self {
            tripwire_triggered: false,
            reason: None,
        }
    }

    pub fn trip(reason: impl Into<String>) -> Self {
        Self {
            tripwire_triggered: true,
            reason: Some(reason.into()),
        }
    }
}

pub trait Guardrail: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, text: &str) -> GuardrailOutcome;
}

/// Run guardrails in order; the first trip becomes an error
pub fn run_guardrails(guardrails: &[Arc<dyn Guardrail>], text: &str) -> Result<()> {
    for guardrail in guardrails {
        let outcome = guardrail.check(text);
        if outcome.tripwire_triggered {
            return Err(AppError::GuardrailTriggered {
                guardrail: guardrail.name().to_string(),
                reason: outcome.reason.unwrap_or_default(),
            });
        }
    }
    Ok(())
}

pub struct EmptyText;

impl Guardrail for EmptyText {
    fn name(&self) -> &str {
        "empty_text"
    }

    fn check(&self, text: &str) -> GuardrailOutcome {
        if text.trim().is_empty() {
            GuardrailOutcome::trip("text is empty")
        } else {
            GuardrailOutcome::pass()
        }
    }
}

pub struct MaxLength(pub usize);

impl Guardrail for MaxLength {
    fn name(&self) -> &str {
        "max_length"
    }

    fn check(&self, text: &str) -> GuardrailOutcome {
        let len = text.chars().count();
        if len > self.0 {
            GuardrailOutcome::trip(format!("{} characters exceeds the limit of {}", len, self.0))
        } else {
            GuardrailOutcome::pass()
        }
    }
}

/// Trips when the text contains any listed term, case-insensitively
pub struct BlockedTerms {
    name: String,
    terms: Vec<String>,
}

impl BlockedTerms {
    pub fn new(name: impl Into<String>, terms: &[&str]) -> Self {
        Self {
            name: name.into(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn harmful_content() -> Self {
        Self::new(
            "harmful_content",
            &["build a bomb", "make a weapon", "malware", "hack into", "steal credentials"],
        )
    }

    pub fn inappropriate_language() -> Self {
        Self::new("inappropriate_language", &["idiot", "stupid", "shut up"])
    }
}

impl Guardrail for BlockedTerms {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, text: &str) -> GuardrailOutcome {
        let lowered = text.to_lowercase();
        match self.terms.iter().find(|t| lowered.contains(t.as_str())) {
            Some(term) => GuardrailOutcome::trip(format!("contains blocked term '{}'", term)),
            None => GuardrailOutcome::pass(),
        }
    }
}

/// Trips on answers that are really error messages
pub struct ErrorMarker;

impl Guardrail for ErrorMarker {
    fn name(&self) -> &str {
        "error_marker"
    }

    fn check(&self, text: &str) -> GuardrailOutcome {
        if text.trim_start().to_lowercase().starts_with("error") {
            GuardrailOutcome::trip("output reports an error")
        } else {
            GuardrailOutcome::pass()
        }
    }
}

pub fn default_input_guardrails() -> Vec<Arc<dyn Guardrail>> {
    vec![
        Arc::new(EmptyText),
        Arc::new(MaxLength(MAX_INPUT_CHARS)),
        Arc::new(BlockedTerms::harmful_content()),
        Arc::new(BlockedTerms::inappropriate_language()),
    ]
}

pub fn default_output_guardrails() -> Vec<Arc<dyn Guardrail>> {
    vec![
        Arc::new(EmptyText),
        Arc::new(MaxLength(MAX_OUTPUT_CHARS)),
        Arc::new(ErrorMarker),
    ]
}
