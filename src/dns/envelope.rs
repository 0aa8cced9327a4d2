//! Beget wraps every API answer twice:
//! `{"status": .., "answer": {"status": .., "errors": [..], "result": ..}}`.
//! A call succeeded only when both statuses are `"success"`.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};

const SUCCESS: &str = "success";

/// Inner payload of a successful call.
#[derive(Debug)]
pub struct Answer {
    pub errors: Vec<ApiError>,
    pub result: Value,
}

#[derive(Debug)]
pub struct ApiError {
    pub error_code: Value,
    pub error_text: Value,
}

impl ApiError {
    fn from_value(entry: &Value) -> Self {
        Self {
            error_code: entry.get("error_code").cloned().unwrap_or_default(),
            error_text: entry.get("error_text").cloned().unwrap_or_default(),
        }
    }
}

pub fn decode(status: StatusCode, body: &str, operation: &str) -> Result<Answer> {
    if !status.is_success() {
        return Err(Error::Transport(format!(
            "error api call {} ({}): {}",
            operation, status, body
        )));
    }

    let raw: Value = serde_json::from_str(body)?;
    let inner = raw.get("answer");

    // Anything other than a list of errors carries no advice.
    let errors: Vec<ApiError> = inner
        .and_then(|answer| answer.get("errors"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(ApiError::from_value).collect())
        .unwrap_or_default();

    if !errors.is_empty() {
        warn!("api call {} errors:", operation);
        for error in &errors {
            warn!(
                "  code: {}  text: {}",
                plain(&error.error_code),
                plain(&error.error_text)
            );
        }
    }

    let outer_ok = status_of(Some(&raw)) == Some(SUCCESS);
    let inner_ok = status_of(inner) == Some(SUCCESS);

    if !(outer_ok && inner_ok) {
        return Err(Error::Provider(format!(
            "error api call {}: {}",
            operation,
            serde_json::to_string_pretty(&raw)?
        )));
    }

    let result = inner
        .and_then(|answer| answer.get("result"))
        .cloned()
        .unwrap_or_default();

    Ok(Answer { errors, result })
}

fn status_of(level: Option<&Value>) -> Option<&str> {
    level.and_then(|v| v.get("status")).and_then(Value::as_str)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
