use crate::tools::registry::{parse_args, Tool};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

pub struct CurrentTime;

#[async_trait]
impl Tool for CurrentTime {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current UTC time in ISO 8601 format"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Ok(json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)))
    }
}

#[derive(Deserialize)]
struct AddDaysArgs {
    base_date: String,
    days: i64,
}

/// Shift an ISO date or date-time by whole days, keeping the input's shape
fn shift(base: &str, days: i64) -> Result<String> {
    let base = base.trim();
    let delta = Duration::try_days(days)
        .ok_or_else(|| AppError::Tool(format!("{} days is out of range", days)))?;
    let overflow = || AppError::Tool("resulting date is out of range".to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(base) {
        return dt
            .checked_add_signed(delta)
            .map(|d| d.to_rfc3339())
            .ok_or_else(overflow);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(base, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt
            .checked_add_signed(delta)
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .ok_or_else(overflow);
    }
    if let Ok(date) = NaiveDate::parse_from_str(base, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|d| d.checked_add_signed(delta))
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .ok_or_else(overflow);
    }

    Err(AppError::Tool(format!(
        "'{}' is not an ISO date or date-time",
        base
    )))
}

pub struct AddDays;

#[async_trait]
impl Tool for AddDays {
    fn name(&self) -> &str {
        "add_days"
    }

    fn description(&self) -> &str {
        "Add a number of days to an ISO date and return the new date-time"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "base_date": { "type": "string", "description": "ISO 8601 date or date-time" },
                "days": { "type": "integer" }
            },
            "required": ["base_date", "days"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: AddDaysArgs = parse_args(self.name(), args)?;
        Ok(json!(shift(&args.base_date, args.days)?))
    }
}
