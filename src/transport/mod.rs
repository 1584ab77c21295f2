pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::{Result, RilletError};

pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// The only status code that counts as success for this verb.
    pub fn expected_status(self) -> u16 {
        match self {
            Verb::Post => 201,
            Verb::Get | Verb::Put | Verb::Delete => 200,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// Username/password pair for HTTP Basic auth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Auth is only sent when both parts are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// JSON request/response transport to the server.
///
/// A successful call yields the parsed JSON body, or `None` when the body was
/// empty. Any status other than [`Verb::expected_status`] becomes
/// [`RilletError::Status`] carrying the parsed error body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, verb: Verb, path: &str, body: Option<&Value>) -> Result<Option<Value>>;

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.request(Verb::Get, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Verb::Post, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Verb::Put, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request(Verb::Delete, path, None).await
    }
}

/// Turn a raw response into the transport outcome for `verb`.
pub fn interpret_response(verb: Verb, status: u16, text: &str) -> Result<Option<Value>> {
    if status == verb.expected_status() {
        return parse_body(text);
    }

    let body = if text.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    };

    Err(RilletError::Status { status, body })
}

fn parse_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(text)?))
}
