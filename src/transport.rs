use async_trait::async_trait;

use crate::error::TransportError;

/// A single HTTP request issued by the flush cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub method: &'static str,
    pub url: String,
    pub body: String,
}

impl PostRequest {
    pub fn post(url: impl Into<String>, body: String) -> Self {
        PostRequest {
            method: "POST",
            url: url.into(),
            body,
        }
    }
}

/// What the flush cycle needs to know about a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    /// Statuses in `[200, 400)` count as delivered.
    pub fn is_delivered(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Asynchronous HTTP capability used to ship batches to the collector.
///
/// Implementations only need to perform the request and report the status
/// code; deciding whether that status means success is up to the logger.
/// `post` is awaited on a task of its own, never on the timer task, so a
/// slow request only delays the batch it carries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request` and return the response status.
    ///
    /// **Returns**
    /// - `Ok(response)` whenever the server answered, whatever the status.
    /// - `Err(..)` for connection, TLS or timeout failures.
    async fn post(&self, request: PostRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_statuses() {
        for status in [200, 201, 204, 302, 399] {
            assert!(TransportResponse { status }.is_delivered(), "{status}");
        }
        for status in [100, 199, 400, 404, 500, 503] {
            assert!(!TransportResponse { status }.is_delivered(), "{status}");
        }
    }
}
