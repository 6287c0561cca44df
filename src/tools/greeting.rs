use crate::tools::registry::Tool;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct HelloWorld;

#[async_trait]
impl Tool for HelloWorld {
    fn name(&self) -> &str {
        "hello_world_tool"
    }

    fn description(&self) -> &str {
        "Return a friendly greeting"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Ok(json!("Hello, world!"))
    }
}
