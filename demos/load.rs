use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;
use tracing::error;

use sumo_log_sink::init::{init_tracing_with_config, LayerConfig};
use sumo_log_sink::noop_transport::NoopTransport;
use sumo_log_sink::{LoggerOptions, SumoLogger};

#[tokio::main]
async fn main() {
    let opts = LoggerOptions::new("LOAD-TEST")
        .sync_interval(Duration::from_millis(200))
        .max_lines(10_000);
    let logger = SumoLogger::from_options(opts, Arc::new(NoopTransport)).expect("build logger");

    let layer_config = LayerConfig {
        min_level: tracing::Level::ERROR,
        enable_stdout: false,
    };
    init_tracing_with_config(logger.clone(), layer_config).expect("set global subscriber");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "load test error");
    }

    let elapsed = start.elapsed();
    println!("queued {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    let start = Instant::now();
    logger.drain().await.expect("noop transport never fails");
    println!("drained in {:?}", start.elapsed());
}
