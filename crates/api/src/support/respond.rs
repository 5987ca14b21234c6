#![forbid(unsafe_code)]

use super::runtime::STORAGE_DIR_ENV;
use dk_storage::StoreError;
use serde_json::{Value, json};

pub(crate) fn ok(result: Value) -> Value {
    json!({ "success": true, "result": result, "error": null })
}

pub(crate) fn error(code: &str, message: &str) -> Value {
    error_with(code, message, None)
}

pub(crate) fn error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({ "success": false, "result": {}, "error": Value::Object(error_obj) })
}

/// Configuration problems get an actionable recovery hint; data problems
/// keep their lifecycle/store code as-is.
pub(crate) fn store_error(err: &StoreError) -> Value {
    match err {
        StoreError::SchemaUnavailable { .. } => error_with(
            err.code(),
            &err.to_string(),
            Some(&format!(
                "point --storage-dir (or {STORAGE_DIR_ENV}) at a writable directory"
            )),
        ),
        StoreError::Unavailable => error_with(
            err.code(),
            &err.to_string(),
            Some("storage is busy; retry the request"),
        ),
        _ => error(err.code(), &err.to_string()),
    }
}
