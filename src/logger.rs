use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::config::{LoggerConfig, LoggerOptions};
use crate::encode::{encode_line, join_lines};
use crate::error::{BuildError, DeliveryError, TransportError};
use crate::transport::{PostRequest, Transport, TransportResponse};

/// Callback registered by [`SumoLogger::end`].
pub type DrainCallback = Box<dyn FnOnce(Result<(), DeliveryError>) + Send + 'static>;

/// Buffered log shipper.
///
/// Records passed to [`write`](Self::write) are encoded to JSON right away
/// and queued. A background timer task wakes up every `sync_interval` and,
/// if no request is outstanding, POSTs up to `max_lines` of the oldest
/// queued lines to the collector as one newline-delimited body. Lines are
/// only dropped from the queue once the collector acknowledged them with a
/// status in `[200, 400)`; on any failure the same lines lead the next
/// attempt.
///
/// The handle is cheap to clone. The timer task stops when the last clone
/// is dropped; a request already in flight still runs to completion. A
/// drain callback still waiting once the logger is gone runs with
/// [`DeliveryError::Abandoned`].
#[derive(Clone)]
pub struct SumoLogger {
    shared: Arc<Shared>,
    _timer: Arc<TimerGuard>,
}

struct Shared {
    config: LoggerConfig,
    transport: Arc<dyn Transport>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    buffer: VecDeque<String>,
    /// Lines carried by the outstanding request, 0 when idle.
    in_flight: usize,
    pending_drain: Option<DrainCallback>,
}

struct TimerGuard(JoinHandle<()>);

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl SumoLogger {
    /// Create a logger and spawn its flush timer on the current Tokio
    /// runtime.
    ///
    /// **Returns**
    /// - `Err(BuildError::NoRuntime)` when called outside a runtime.
    pub fn new(config: LoggerConfig, transport: Arc<dyn Transport>) -> Result<Self, BuildError> {
        let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let shared = Arc::new(Shared {
            config,
            transport,
            state: Mutex::new(State::default()),
        });

        let timer = runtime.spawn(run_timer(Arc::clone(&shared)));

        Ok(SumoLogger {
            shared,
            _timer: Arc::new(TimerGuard(timer)),
        })
    }

    /// Validate `opts` and create a logger shipping through `transport`.
    ///
    /// Fails with [`BuildError::MissingCollector`] if no collector key was
    /// given.
    pub fn from_options(opts: LoggerOptions, transport: Arc<dyn Transport>) -> Result<Self, BuildError> {
        Self::new(LoggerConfig::from_options(opts)?, transport)
    }

    /// Create a logger that ships over HTTP with a default
    /// [`ReqwestTransport`](crate::http::ReqwestTransport).
    #[cfg(feature = "http")]
    pub fn with_http(opts: LoggerOptions) -> Result<Self, BuildError> {
        Self::from_options(opts, Arc::new(crate::http::ReqwestTransport::new()))
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.shared.config
    }

    /// Queue one record for shipping.
    ///
    /// The record is encoded immediately (see
    /// [`encode_line`](crate::encode::encode_line)); encoding problems fall
    /// back to a string form instead of failing, so this never returns an
    /// error.
    pub fn write<R>(&self, record: &R)
    where
        R: Serialize + fmt::Debug + ?Sized,
    {
        let line = encode_line(record, self.shared.config.rewrite_levels);
        self.shared.lock().buffer.push_back(line);
    }

    /// Ask to be notified once everything queued so far has been shipped.
    ///
    /// - Empty queue: `callback` runs right away with `Ok(())`.
    /// - Otherwise it runs after a later flush: with `Ok(())` once a
    ///   successful flush leaves the queue empty, or with the error of the
    ///   first flush that fails.
    ///
    /// Only one drain can be pending. A second call while one is waiting
    /// is rejected by running its callback at once with
    /// [`DeliveryError::DrainPending`]; the first stays registered.
    pub fn end<F>(&self, callback: F)
    where
        F: FnOnce(Result<(), DeliveryError>) + Send + 'static,
    {
        let immediate = {
            let mut state = self.shared.lock();
            if state.buffer.is_empty() {
                Ok(())
            } else if state.pending_drain.is_some() {
                Err(DeliveryError::DrainPending)
            } else {
                state.pending_drain = Some(Box::new(callback));
                return;
            }
        };

        callback(immediate);
    }

    /// Future form of [`end`](Self::end).
    pub async fn drain(&self) -> Result<(), DeliveryError> {
        let (tx, rx) = oneshot::channel();
        self.end(move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or(Err(DeliveryError::Abandoned))
    }

    /// Number of lines not yet acknowledged by the collector, including
    /// those in the outstanding request.
    pub fn buffered_len(&self) -> usize {
        self.shared.lock().buffer.len()
    }

    /// Number of lines carried by the outstanding request, 0 when idle.
    pub fn in_flight(&self) -> usize {
        self.shared.lock().in_flight
    }
}

impl fmt::Debug for SumoLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumoLogger")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

async fn run_timer(shared: Arc<Shared>) {
    let period = shared.config.sync_interval;
    let Some(start) = Instant::now().checked_add(period) else {
        warn!(?period, "sync interval out of range, logger will never flush");
        return;
    };
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        Shared::sync(&shared);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = state.pending_drain.take() {
            callback(Err(DeliveryError::Abandoned));
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One timer tick: dispatch the head of the queue unless a request is
    /// already outstanding or there is nothing to send.
    fn sync(self: &Arc<Self>) {
        let body = {
            let mut state = self.lock();
            if state.in_flight > 0 || state.buffer.is_empty() {
                None
            } else {
                let batch = state.buffer.len().min(self.config.max_lines);
                state.in_flight = batch;
                Some((batch, join_lines(state.buffer.range(..batch))))
            }
        };

        let Some((batch, body)) = body else {
            trace!("nothing to sync");
            return;
        };

        debug!(lines = batch, "syncing log lines to collector");
        let request = PostRequest::post(self.config.collector_url.clone(), body);
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = shared.transport.post(request).await;
            shared.complete(outcome);
        });
    }

    /// Apply the outcome of the outstanding request.
    fn complete(&self, outcome: Result<TransportResponse, TransportError>) {
        let result = match outcome {
            Ok(response) if response.is_delivered() => Ok(()),
            Ok(response) => Err(DeliveryError::Status(response.status)),
            Err(e) => Err(DeliveryError::Transport(e)),
        };

        let (sent, remaining, drain) = {
            let mut state = self.lock();
            let sent = std::mem::take(&mut state.in_flight);
            if result.is_ok() {
                // Lines appended while the request was in flight sit after
                // the first `sent` entries and are kept.
                state.buffer.drain(..sent);
            }
            let drain = if result.is_err() || state.buffer.is_empty() {
                state.pending_drain.take()
            } else {
                None
            };
            (sent, state.buffer.len(), drain)
        };

        match &result {
            Ok(()) => debug!(lines = sent, remaining, "log lines delivered"),
            Err(e) => warn!(lines = sent, error = %e, "log sync failed, will retry"),
        }

        if let Some(callback) = drain {
            callback(result);
        }
    }
}
