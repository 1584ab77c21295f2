use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;

use crate::plugins::ExtractionError;

/// A page request made on behalf of a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Fetches page bodies for plugins.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, request: &PageRequest) -> Result<String, ExtractionError>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("rillet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, request: &PageRequest) -> Result<String, ExtractionError> {
        let mut headers = HeaderMap::new();

        for (name, value) in &request.headers {
            let invalid = || ExtractionError::InvalidHeader(name.clone());
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        debug!("Plugin fetch {}", request.url);
        let response = self.client.get(&request.url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16(), request.url.clone()));
        }

        Ok(response.text().await?)
    }
}
