use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use crate::config::{parse_node_address, ClientConfig};
use crate::error::{CoreError, TransportError};

/// Whatever came back from the node, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReply {
    pub status: u16,
    pub body: String,
}

impl NodeReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON body to the node.
///
/// Implementations return `Err` only when no reply was obtained at all
/// (connection, DNS, timeout, or body read failure). Any HTTP status,
/// including errors, is an `Ok(NodeReply)`.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<NodeReply, TransportError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, CoreError> {
        parse_node_address(&config.node_address)?;
        Self::new(config.connect_timeout, config.request_timeout)
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<NodeReply, TransportError> {
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(NodeReply { status, body })
    }
}
