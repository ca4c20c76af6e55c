#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use sumo_log_sink::{
    LoggerOptions, PostRequest, SumoLogger, Transport, TransportError, TransportResponse,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

pub const COLLECTOR: &str = "FAKE-COLLECTOR";
pub const INTERVAL: Duration = Duration::from_millis(1000);

/// One request seen by [`ScriptedTransport`], held open until the test
/// decides how it ends.
pub struct Call {
    pub request: PostRequest,
    reply: oneshot::Sender<Result<TransportResponse, TransportError>>,
}

impl Call {
    pub fn respond(self, status: u16) {
        let _ = self.reply.send(Ok(TransportResponse { status }));
    }

    pub fn fail(self, message: &str) {
        let _ = self.reply.send(Err(message.to_string().into()));
    }
}

/// Transport that hands every request to the test and waits for it to be
/// completed through [`Call`].
pub struct ScriptedTransport {
    calls: mpsc::UnboundedSender<Call>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, request: PostRequest) -> Result<TransportResponse, TransportError> {
        let (reply, response) = oneshot::channel();
        self.calls
            .send(Call { request, reply })
            .map_err(|_| "test harness gone")?;
        response.await.map_err(|_| "call dropped without a response")?
    }
}

pub struct Harness {
    pub logger: SumoLogger,
    calls: mpsc::UnboundedReceiver<Call>,
}

impl Harness {
    pub fn new(opts: LoggerOptions) -> Self {
        let (tx, calls) = mpsc::unbounded_channel();
        let transport = Arc::new(ScriptedTransport { calls: tx });
        let logger = SumoLogger::from_options(opts, transport).expect("build logger");
        Harness { logger, calls }
    }

    /// Logger with level rewriting off, as most scenarios compare raw bodies.
    pub fn plain() -> Self {
        Self::new(LoggerOptions::new(COLLECTOR).rewrite_levels(false))
    }

    /// Wait at most one interval (plus slack) for the next request.
    pub async fn next_call(&mut self) -> Call {
        timeout(INTERVAL + Duration::from_millis(1), self.calls.recv())
            .await
            .expect("no request within one sync interval")
            .expect("transport dropped")
    }

    /// Assert that no request is issued for `period`.
    pub async fn assert_no_call_for(&mut self, period: Duration) {
        if let Ok(Some(call)) = timeout(period, self.calls.recv()).await {
            panic!("unexpected request with body {:?}", call.request.body);
        }
    }
}
