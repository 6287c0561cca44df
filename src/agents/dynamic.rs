use arc_swap::ArcSwap;
use std::sync::Arc;

pub const DEFAULT_DYNAMIC_PROMPT: &str = "You are a helpful assistant.";

/// Process-wide system prompt that can be replaced while serving
pub struct DynamicPrompt {
    current: ArcSwap<String>,
}

impl DynamicPrompt {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial.into()),
        }
    }

    pub fn get(&self) -> Arc<String> {
        self.current.load_full()
    }

    /// Replace the prompt and return the stored value
    pub fn set(&self, prompt: impl Into<String>) -> Arc<String> {
        let prompt = Arc::new(prompt.into());
        self.current.store(prompt.clone());
        tracing::info!(len = prompt.len(), "dynamic prompt updated");
        prompt
    }
}

impl Default for DynamicPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_DYNAMIC_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let prompt = DynamicPrompt::default();
        assert_eq!(prompt.get().as_str(), DEFAULT_DYNAMIC_PROMPT);

        let stored = prompt.set("Answer like a pirate.");
        assert_eq!(stored.as_str(), "Answer like a pirate.");
        assert_eq!(prompt.get().as_str(), "Answer like a pirate.");
    }
}
