pub mod config;
pub mod encode;
pub mod env;
pub mod error;
pub mod level;
pub mod logger;
pub mod record;
pub mod transport;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod layer;
pub mod noop_transport;

pub use config::{LoggerConfig, LoggerOptions};
pub use error::{BuildError, DeliveryError, TransportError};
pub use logger::SumoLogger;
pub use transport::{PostRequest, Transport, TransportResponse};
