use crate::error::TransportError;
use crate::transport::{PostRequest, Transport, TransportResponse};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

/// [`Transport`] backed by a `reqwest` client.
///
/// The body is sent as-is with no extra headers. Any status the collector
/// answers with is returned as a response; only connection-level problems
/// (and the optional timeout) become errors.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport { client: Client::new() }
    }

    /// Use a custom client, e.g. one configured with proxies or a timeout.
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }

    /// Build a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(ReqwestTransport { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: PostRequest) -> Result<TransportResponse, TransportError> {
        let method = Method::from_bytes(request.method.as_bytes())?;
        let resp = self
            .client
            .request(method, &request.url)
            .body(request.body)
            .send()
            .await?;

        Ok(TransportResponse {
            status: resp.status().as_u16(),
        })
    }
}
