use crate::types::{AppError, Result, ToolDefinition};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Deserialize tool arguments, naming the tool on failure
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| AppError::Tool(format!("Invalid arguments for '{}': {}", tool, e)))
}

/// Render a tool result as the text an agent or pipeline sees
pub fn output_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a new registry with every built-in tool
    pub fn with_default_tools() -> Self {
        use crate::tools::{data, datetime, greeting, math, story, text};

        let mut registry = Self::new();

        registry.register(Arc::new(greeting::HelloWorld));

        registry.register(Arc::new(story::BaselineOutline));
        registry.register(Arc::new(story::CustomOutline));
        registry.register(Arc::new(story::AdvancedOutline));
        registry.register(Arc::new(story::AdvancedStoryBody));
        registry.register(Arc::new(story::GenerateOutline));
        registry.register(Arc::new(story::GenerateStory));
        registry.register(Arc::new(story::GenerateEnding));

        registry.register(Arc::new(text::Echo));
        registry.register(Arc::new(text::Concatenate));
        registry.register(Arc::new(text::ToUppercase));

        registry.register(Arc::new(math::Add));
        registry.register(Arc::new(math::Multiply));

        registry.register(Arc::new(datetime::CurrentTime));
        registry.register(Arc::new(datetime::AddDays));

        registry.register(Arc::new(data::FetchMockData));
        registry.register(Arc::new(data::SummarizeList));
        registry.register(Arc::new(data::GetItem));

        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|tool| tool.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Definitions for the named tools, in the order given; unknown names are skipped
    pub fn definitions_for(&self, names: &[String]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| match self.tools.get(name) {
                Some(tool) => Some(tool.definition()),
                None => {
                    tracing::warn!(tool = %name, "requested tool is not registered");
                    None
                }
            })
            .collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        if let Some(tool) = self.tools.get(name) {
            tool.execute(args).await
        } else {
            Err(AppError::NotFound(format!("Tool not found: {}", name)))
        }
    }

    /// Get a list of all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}
