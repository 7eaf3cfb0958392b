use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// One outbound JSON POST
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub bearer_token: String,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

/// Raw status and body; interpretation is left to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, req: &HttpRequest) -> Result<HttpReply>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, req: &HttpRequest) -> Result<HttpReply> {
        let response = self
            .client
            .post(&req.url)
            .header("Authorization", format!("Bearer {}", req.bearer_token))
            .header("Content-Type", "application/json")
            .timeout(req.timeout)
            .json(&req.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(url = %req.url, status, bytes = body.len(), "Inference API responded");
        Ok(HttpReply { status, body })
    }
}
