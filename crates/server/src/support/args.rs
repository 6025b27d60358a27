#![forbid(unsafe_code)]

use super::ai::ai_error;
use sb_core::Cell;
use sb_core::parse::{safe_float, safe_int};
use serde_json::Value;

pub(crate) type Args = serde_json::Map<String, Value>;

pub(crate) fn require_string(args: &Args, key: &str) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
    };
    Ok(v.to_string())
}

pub(crate) fn optional_string(args: &Args, key: &str) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

/// Numbers pass through; strings go through the lenient cell parser, so `"45%"`
/// reads as 45 and unparsable text as 0.
pub(crate) fn optional_i64(args: &Args, key: &str) -> Result<Option<i64>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n.as_i64().unwrap_or_else(|| safe_int(&number_cell(n))))),
        Value::String(raw) => Ok(Some(safe_int(&Cell::text(raw.as_str())))),
        _ => Err(ai_error("INVALID_INPUT", &format!("{key} must be a number or a string"))),
    }
}

pub(crate) fn optional_f64(args: &Args, key: &str) -> Result<Option<f64>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(safe_float(&number_cell(n)))),
        Value::String(raw) => Ok(Some(safe_float(&Cell::text(raw.as_str())))),
        _ => Err(ai_error("INVALID_INPUT", &format!("{key} must be a number or a string"))),
    }
}

fn number_cell(n: &serde_json::Number) -> Cell {
    match n.as_i64() {
        Some(v) => Cell::Int(v),
        None => Cell::Float(n.as_f64().unwrap_or_default()),
    }
}

/// `credentials: { username, password }` carried by every action call.
pub(crate) fn require_credentials(params: &Args) -> Result<(String, String), Value> {
    let Some(credentials) = params.get("credentials").and_then(|v| v.as_object()) else {
        return Err(ai_error("INVALID_INPUT", "credentials is required"));
    };
    let username = require_string(credentials, "username")
        .map_err(|_| ai_error("INVALID_INPUT", "credentials.username is required"))?;
    let password = require_string(credentials, "password")
        .map_err(|_| ai_error("INVALID_INPUT", "credentials.password is required"))?;
    Ok((username, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn optional_numbers_accept_numeric_text() {
        let a = args(json!({
            "progress": "45%",
            "plain": " 50 ",
            "junk": "about half",
            "target": 12.5,
            "count": 7.9,
            "flag": true
        }));
        assert_eq!(optional_i64(&a, "progress").unwrap(), Some(45));
        assert_eq!(optional_i64(&a, "plain").unwrap(), Some(50));
        assert_eq!(optional_i64(&a, "junk").unwrap(), Some(0));
        assert_eq!(optional_i64(&a, "count").unwrap(), Some(7));
        assert_eq!(optional_f64(&a, "target").unwrap(), Some(12.5));
        assert_eq!(optional_f64(&a, "progress").unwrap(), Some(45.0));
        assert_eq!(optional_f64(&a, "missing").unwrap(), None);
        assert!(optional_i64(&a, "flag").is_err());
    }

    #[test]
    fn credentials_require_both_fields() {
        let ok = args(json!({ "credentials": { "username": "sara", "password": "pw" } }));
        assert_eq!(
            require_credentials(&ok).unwrap(),
            ("sara".to_string(), "pw".to_string())
        );
        let missing = args(json!({ "credentials": { "username": "sara" } }));
        let err = require_credentials(&missing).unwrap_err();
        assert_eq!(err["error"]["message"], "credentials.password is required");
        assert!(require_credentials(&args(json!({}))).is_err());
    }
}
