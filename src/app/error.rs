use serde_json::Value;
use thiserror::Error;

use crate::plugins::ExtractionError;

#[derive(Error, Debug)]
pub enum RilletError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}{}", describe_body(.body))]
    Status { status: u16, body: Option<Value> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl RilletError {
    /// The parsed error body returned by the server, if this is a status error.
    pub fn error_body(&self) -> Option<&Value> {
        match self {
            RilletError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

fn describe_body(body: &Option<Value>) -> String {
    match body {
        Some(Value::String(text)) => format!(": {}", text),
        Some(Value::Object(map)) => match map.get("error").and_then(Value::as_str) {
            Some(message) => format!(": {}", message),
            None => format!(": {}", Value::Object(map.clone())),
        },
        Some(other) => format!(": {}", other),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RilletError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_display_uses_error_field() {
        let err = RilletError::Status {
            status: 404,
            body: Some(json!({"error": "Subscription not found"})),
        };
        assert_eq!(err.to_string(), "Unexpected status 404: Subscription not found");
    }

    #[test]
    fn test_status_error_display_without_body() {
        let err = RilletError::Status {
            status: 500,
            body: None,
        };
        assert_eq!(err.to_string(), "Unexpected status 500");
        assert!(err.error_body().is_none());
    }
}
