#![forbid(unsafe_code)]

use super::respond::error;
use super::time::rfc3339_to_ts_ms;
use dk_core::model::{Category, Urgency};
use serde_json::{Map, Value};

pub(crate) fn require_args(args: Option<Value>) -> Result<Map<String, Value>, Value> {
    match args {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(error("INVALID_INPUT", "args must be an object")),
        None => Err(error("INVALID_INPUT", "args are required")),
    }
}

pub(crate) fn require_id(args: &Map<String, Value>) -> Result<i64, Value> {
    args.get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| error("VALIDATION_FAILED", "id is required and must be an integer"))
}

pub(crate) fn require_string(args: &Map<String, Value>, key: &str) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(error("VALIDATION_FAILED", &format!("{key} is required")));
    };
    Ok(v.to_string())
}

pub(crate) fn optional_string(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(error(
            "VALIDATION_FAILED",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn optional_category(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<Category>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    match Category::parse(&raw) {
        Some(category) => Ok(Some(category)),
        None => Err(error(
            "VALIDATION_FAILED",
            &format!(
                "{key} must be one of pending, scheduled, in_progress, support, cancelled, done"
            ),
        )),
    }
}

pub(crate) fn optional_urgency(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<Urgency>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    match Urgency::parse(&raw) {
        Some(urgency) => Ok(Some(urgency)),
        None => Err(error(
            "VALIDATION_FAILED",
            &format!("{key} must be one of low, normal, high, critical"),
        )),
    }
}

pub(crate) fn optional_timestamp(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    match rfc3339_to_ts_ms(&raw) {
        Some(ts_ms) => Ok(Some(ts_ms)),
        None => Err(error(
            "VALIDATION_FAILED",
            &format!("{key} must be an RFC3339 timestamp"),
        )),
    }
}
