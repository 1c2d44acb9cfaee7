//! The seam between the interaction logic and the network.

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use runner_http::HttpClient;
use tracing::debug;

use super::error::TransportError;

/// An HTTP reply of any status, body unread by the transport.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Posts a JSON document to a URL.
///
/// Only failures that prevent an HTTP reply are errors; classifying the
/// status and decoding the body happen above this trait.
#[async_trait]
pub trait FunctionTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<RawReply, TransportError>;
}

/// [`FunctionTransport`] over the shared HTTP client.
#[derive(Clone)]
pub struct HttpFunctionTransport {
    client: HttpClient,
}

impl HttpFunctionTransport {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionTransport for HttpFunctionTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<RawReply, TransportError> {
        let response = self.client.post(url).json(body)?.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "remote function replied");
        Ok(RawReply { status, body })
    }
}
