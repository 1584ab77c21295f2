use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::app::Result;
use crate::transport::{interpret_response, Credentials, Transport, Verb};

/// reqwest-based transport. The client is built without a timeout; a hung
/// request stalls its caller until the caller gives up on the future.
pub struct HttpTransport {
    client: Client,
    address: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(address: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("rillet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, address, credentials))
    }

    pub fn with_client(client: Client, address: impl Into<String>, credentials: Credentials) -> Self {
        let address = address.into().trim_end_matches('/').to_string();
        Self {
            client,
            address,
            credentials,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, verb: Verb, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let method = match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        };

        let url = self.url_for(path);
        debug!("{} {}", verb.as_str(), url);

        let mut request = self.client.request(method, &url);

        if self.credentials.is_complete() {
            request = request.basic_auth(&self.credentials.username, Some(&self.credentials.password));
        }

        if matches!(verb, Verb::Post | Verb::Put) {
            let payload = body.cloned().unwrap_or(Value::Null);
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(serde_json::to_vec(&payload)?);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!("{} {} -> {}", verb.as_str(), url, status);
        interpret_response(verb, status, &text)
    }
}
