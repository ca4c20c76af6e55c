//! Installs the global subscriber, so it gets a test binary of its own.

mod common;

use common::{Harness, COLLECTOR};
use serde_json::Value;
use sumo_log_sink::init::{init_tracing, init_tracing_with_config, LayerConfig};
use sumo_log_sink::LoggerOptions;
use tracing::{debug, warn, Level};

#[tokio::test(start_paused = true)]
async fn installs_global_subscriber_once() {
    let mut harness = Harness::new(LoggerOptions::new(COLLECTOR));

    let config = LayerConfig {
        min_level: Level::INFO,
        enable_stdout: false,
    };
    init_tracing_with_config(harness.logger.clone(), config).expect("first install succeeds");

    debug!("below the configured level");
    warn!(disk = "/var", "disk almost full");

    let call = harness.next_call().await;
    let record: Value = serde_json::from_str(&call.request.body).unwrap();
    call.respond(200);

    assert_eq!(record["level"], "WARN");
    assert_eq!(record["msg"], "disk almost full");
    assert_eq!(record["disk"], "/var");

    // A global default can only be set once per process.
    assert!(init_tracing(harness.logger.clone()).is_err());
}
