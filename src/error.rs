use std::error::Error;

/// Error produced by a [`Transport`](crate::transport::Transport) when a
/// request could not be completed.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// Error type returned when building a logger from options.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("collector key must be passed")]
    MissingCollector,

    #[error("logger must be created inside a Tokio runtime")]
    NoRuntime,
}

/// Reason a flush did not deliver its batch, reported to a pending drain.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error("collector responded with status {0}")]
    Status(u16),

    #[error("a drain is already pending")]
    DrainPending,

    #[error("logger was dropped before the drain completed")]
    Abandoned,
}
