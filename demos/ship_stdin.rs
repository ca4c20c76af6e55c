use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use sumo_log_sink::{LoggerOptions, SumoLogger};

/// Ship newline-delimited records from stdin to the collector configured
/// through the `SUMO_LOG_*` environment variables, then wait for the
/// queue to drain.
///
/// Lines that are not valid JSON are shipped as JSON strings.
///
/// ```text
/// SUMO_LOG_COLLECTOR=... cargo run --example ship_stdin < app.log
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let logger = SumoLogger::with_http(LoggerOptions::from_env())?;
    info!(url = %logger.config().collector_url, "shipping stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut count: u64 = 0;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(record) => logger.write(&record),
            Err(_) => logger.write(line.as_str()),
        }
        count += 1;
    }

    info!(count, "stdin closed, draining");
    if let Err(e) = logger.drain().await {
        error!(error = %e, "drain failed, {} lines unsent", logger.buffered_len());
        return Err(e.into());
    }
    Ok(())
}
