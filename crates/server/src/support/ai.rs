#![forbid(unsafe_code)]

use sb_storage::StoreError;
use serde_json::{Value, json};

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new())
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None)
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
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

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn store_error_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        StoreError::Io(_) | StoreError::Sql(_) | StoreError::Json(_) => "STORE_ERROR",
        StoreError::InvalidInput(_) => "INVALID_INPUT",
        StoreError::InvalidCredentials => "INVALID_CREDENTIALS",
        StoreError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
        StoreError::UnknownRole(_) => "UNKNOWN_ROLE",
        StoreError::Forbidden { .. } => "FORBIDDEN",
        StoreError::RevisionMismatch { .. } => "REVISION_MISMATCH",
    }
}

pub(crate) fn store_error(err: &StoreError) -> Value {
    let recovery = match err {
        StoreError::StoreUnavailable(_)
        | StoreError::Io(_)
        | StoreError::Sql(_)
        | StoreError::Json(_) => {
            Some("Nothing was saved. Retry once the table store is reachable.")
        }
        StoreError::RecordNotFound { .. } => {
            Some("Reload the list; the record may have been renamed or removed.")
        }
        StoreError::UnknownRole(_) => {
            Some("Ask an administrator to correct the role in the Users table.")
        }
        StoreError::RevisionMismatch { .. } => {
            Some("Another session saved this table first. Reload and reapply the change.")
        }
        StoreError::InvalidInput(_)
        | StoreError::InvalidCredentials
        | StoreError::Forbidden { .. } => None,
    };
    let message = match err {
        StoreError::InvalidInput(message) => (*message).to_string(),
        other => other.to_string(),
    };
    ai_error_with(store_error_code(err), &message, recovery)
}
