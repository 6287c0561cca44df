//! Rule-based model recommendation
//!
//! Picks a provider and model from the task type and an estimated token count
//! (four characters per token).

use crate::llm::provider_registry::ProviderKind;
use crate::types::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Reasoning,
    Conversation,
    Creative,
    Code,
    Default,
}

impl TaskType {
    /// Case-insensitive; unknown names fall back to [`TaskType::Default`]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "reasoning" => TaskType::Reasoning,
            "conversation" => TaskType::Conversation,
            "creative" => TaskType::Creative,
            "code" => TaskType::Code,
            _ => TaskType::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
}

impl LengthCategory {
    pub fn from_prompt_length(chars: usize) -> Self {
        let tokens = chars / 4;
        if tokens < 500 {
            LengthCategory::Short
        } else if tokens < 2000 {
            LengthCategory::Medium
        } else {
            LengthCategory::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
        }
    }
}

fn provider_for(task: TaskType, length: LengthCategory) -> ProviderKind {
    use LengthCategory::*;
    use ProviderKind::*;

    match (task, length) {
        (TaskType::Reasoning, Long) => OpenRouter,
        (TaskType::Conversation, Medium | Long) => Gemini,
        (TaskType::Creative, Long) => Gemini,
        (TaskType::Code, Long) => OpenRouter,
        _ => OpenAI,
    }
}

fn model_for(provider: ProviderKind, task: TaskType) -> &'static str {
    use TaskType::*;

    match provider {
        ProviderKind::OpenAI => match task {
            Reasoning | Creative | Code => "gpt-4o",
            Conversation | Default => "gpt-4o-mini",
        },
        ProviderKind::Gemini => match task {
            Reasoning | Creative => "gemini-2.0-pro-exp-02-05",
            Conversation | Code | Default => "gemini-1.5-pro",
        },
        ProviderKind::Requesty => match task {
            Reasoning | Creative | Code => "cline/4o-mini",
            Conversation | Default => "cline/o3-mini",
        },
        ProviderKind::OpenRouter => match task {
            Reasoning | Creative | Code => "openai/gpt-4o",
            Conversation | Default => "openai/gpt-4o-mini",
        },
    }
}

/// Recommend a provider and model for a task
pub fn recommend(task_type: &str, prompt_length: usize) -> Recommendation {
    let task = TaskType::parse(task_type);
    let length = LengthCategory::from_prompt_length(prompt_length);
    let provider = provider_for(task, length);

    tracing::debug!(task = ?task, length = length.as_str(), provider = %provider, "model recommendation");

    Recommendation {
        status: "success".to_string(),
        recommended_provider: provider.as_str().to_string(),
        model: model_for(provider, task).to_string(),
        message: format!(
            "Based on {} task and {} characters ({} length)",
            task_type,
            prompt_length,
            length.as_str()
        ),
    }
}
