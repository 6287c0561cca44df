use crate::tools::registry::{parse_args, Tool};
use crate::types::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct SourceArgs {
    source: String,
}

pub struct FetchMockData;

#[async_trait]
impl Tool for FetchMockData {
    fn name(&self) -> &str {
        "fetch_mock_data"
    }

    fn description(&self) -> &str {
        "Fetch sample data from a named source"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source": { "type": "string" }
            },
            "required": ["source"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: SourceArgs = parse_args(self.name(), args)?;
        Ok(json!({
            "source": args.source,
            "data": "sample data"
        }))
    }
}

#[derive(Deserialize)]
struct ItemsArgs {
    items: Vec<Value>,
}

pub struct SummarizeList;

#[async_trait]
impl Tool for SummarizeList {
    fn name(&self) -> &str {
        "summarize_list"
    }

    fn description(&self) -> &str {
        "Report the length and first item of a list"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "items": { "type": "array", "items": {} }
            },
            "required": ["items"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ItemsArgs = parse_args(self.name(), args)?;
        Ok(json!({
            "length": args.items.len(),
            "first_item": args.items.first().cloned().unwrap_or(Value::Null)
        }))
    }
}

#[derive(Deserialize)]
struct GetItemArgs {
    items: Vec<Value>,
    index: i64,
}

pub struct GetItem;

#[async_trait]
impl Tool for GetItem {
    fn name(&self) -> &str {
        "get_item"
    }

    fn description(&self) -> &str {
        "Get the item at an index; negative indexes count from the end"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "items": { "type": "array", "items": {} },
                "index": { "type": "integer" }
            },
            "required": ["items", "index"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: GetItemArgs = parse_args(self.name(), args)?;
        let len = args.items.len() as i64;
        let idx = if args.index < 0 {
            len + args.index
        } else {
            args.index
        };

        if (0..len).contains(&idx) {
            Ok(args.items[idx as usize].clone())
        } else {
            Ok(Value::Null)
        }
    }
}
