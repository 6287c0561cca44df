use crate::tools::registry::{parse_args, Tool};
use crate::types::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct EchoArgs {
    message: String,
}

pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo a message back"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: EchoArgs = parse_args(self.name(), args)?;
        Ok(json!(format!("Echo: {}", args.message)))
    }
}

#[derive(Deserialize)]
struct ConcatArgs {
    str1: String,
    str2: String,
}

pub struct Concatenate;

#[async_trait]
impl Tool for Concatenate {
    fn name(&self) -> &str {
        "concatenate"
    }

    fn description(&self) -> &str {
        "Join two strings"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "str1": { "type": "string" },
                "str2": { "type": "string" }
            },
            "required": ["str1", "str2"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ConcatArgs = parse_args(self.name(), args)?;
        Ok(json!(args.str1 + &args.str2))
    }
}

#[derive(Deserialize)]
struct TextArgs {
    text: String,
}

pub struct ToUppercase;

#[async_trait]
impl Tool for ToUppercase {
    fn name(&self) -> &str {
        "to_uppercase"
    }

    fn description(&self) -> &str {
        "Convert text to uppercase"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: TextArgs = parse_args(self.name(), args)?;
        Ok(json!(args.text.to_uppercase()))
    }
}
