use crate::tools::registry::{parse_args, Tool};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Number, Value};

#[derive(Deserialize)]
struct Operands {
    a: Number,
    b: Number,
}

fn operands_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": { "type": "number" },
            "b": { "type": "number" }
        },
        "required": ["a", "b"]
    })
}

/// Integers stay integers; anything else is computed as f64
fn apply(
    tool: &str,
    args: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let Operands { a, b } = parse_args(tool, args)?;

    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return int_op(x, y)
            .map(|r| json!(r))
            .ok_or_else(|| AppError::Tool(format!("'{}' overflowed", tool)));
    }

    let (x, y) = match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(AppError::Tool(format!("'{}' needs numeric operands", tool))),
    };
    Number::from_f64(float_op(x, y))
        .map(Value::Number)
        .ok_or_else(|| AppError::Tool(format!("'{}' produced a non-finite result", tool)))
}

pub struct Add;

#[async_trait]
impl Tool for Add {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two numbers"
    }

    fn parameters_schema(&self) -> Value {
        operands_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        apply(self.name(), args, i64::checked_add, |x, y| x + y)
    }
}

pub struct Multiply;

#[async_trait]
impl Tool for Multiply {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two numbers"
    }

    fn parameters_schema(&self) -> Value {
        operands_schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        apply(self.name(), args, i64::checked_mul, |x, y| x * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_integer_math() {
        assert_eq!(Add.execute(json!({"a": 5, "b": 3})).await.unwrap(), json!(8));
        assert_eq!(Multiply.execute(json!({"a": 4, "b": -2})).await.unwrap(), json!(-8));
    }

    #[tokio::test]
    async fn test_float_math() {
        assert_eq!(Add.execute(json!({"a": 1.5, "b": 2})).await.unwrap(), json!(3.5));
        assert_eq!(Multiply.execute(json!({"a": 0.5, "b": 0.5})).await.unwrap(), json!(0.25));
    }

    #[tokio::test]
    async fn test_overflow_and_bad_args() {
        assert!(Multiply
            .execute(json!({"a": i64::MAX, "b": 2}))
            .await
            .is_err());
        assert!(Add.execute(json!({"a": "one", "b": 2})).await.is_err());
    }
}
