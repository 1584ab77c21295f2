//! Typed operations over the server's REST resources.
//!
//! Each method assembles a fixed path and query, hands it to the
//! [`Transport`], and decodes the JSON payload. Errors from the transport are
//! passed through untouched.

mod articles;
mod settings;
mod subscriptions;
mod transfers;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::app::{Result, RilletError};
use crate::transport::Transport;

pub const ARTICLES_PATH: &str = "/articles";
pub const PLUGINS_PATH: &str = "/plugins";
pub const SETTINGS_PATH: &str = "/settings";
pub const SUBSCRIPTIONS_PATH: &str = "/subscriptions";
pub const TRANSFERS_PATH: &str = "/transfers";

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

/// Append `offset` and `limit` to a query. A zero limit means "all" and is
/// left out.
pub(crate) fn paged_query(path: String, offset: usize, limit: usize) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    let mut path = format!("{}{}offset={}", path, separator, offset);

    if limit > 0 {
        path.push_str(&format!("&limit={}", limit));
    }

    path
}

pub(crate) fn decode<T: DeserializeOwned>(value: Option<Value>, path: &str) -> Result<T> {
    let value = value.ok_or_else(|| RilletError::EmptyBody(path.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// Lists tolerate an empty body.
pub(crate) fn decode_list<T: DeserializeOwned>(value: Option<Value>) -> Result<Vec<T>> {
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}
