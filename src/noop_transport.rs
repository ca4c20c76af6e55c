use crate::error::TransportError;
use crate::transport::{PostRequest, Transport, TransportResponse};
use async_trait::async_trait;

/// A transport that accepts every request with status 200.
///
/// Useful for measuring the overhead of the logger itself without any
/// external I/O, and for tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn post(&self, _request: PostRequest) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse { status: 200 })
    }
}
