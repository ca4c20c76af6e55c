//! Environment variable names used by this crate for convenient
//! configuration of the logger from services.
//!
//! These are purely helpers; [`LoggerOptions`](crate::config::LoggerOptions)
//! can be built by hand or deserialized from any config source instead.

/// Collector key appended to the endpoint URL. Required.
pub const SUMO_LOG_COLLECTOR_ENV: &str = "SUMO_LOG_COLLECTOR";

/// Base endpoint URL, e.g. `https://endpoint1.collection.us2.sumologic.com/receiver/v1/http/`.
pub const SUMO_LOG_ENDPOINT_ENV: &str = "SUMO_LOG_ENDPOINT";

/// Flush interval in milliseconds.
pub const SUMO_LOG_SYNC_INTERVAL_MS_ENV: &str = "SUMO_LOG_SYNC_INTERVAL_MS";

/// Maximum number of lines per request.
pub const SUMO_LOG_MAX_LINES_ENV: &str = "SUMO_LOG_MAX_LINES";

/// Toggle for numeric level rewriting. Accepts `true`/`false`, `1`/`0`,
/// `yes`/`no` and `on`/`off`, case-insensitively.
pub const SUMO_LOG_REWRITE_LEVELS_ENV: &str = "SUMO_LOG_REWRITE_LEVELS";

/// Read an environment variable, treating unset and empty the same.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, ignoring values that don't parse.
pub fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_opt(key).and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag; unrecognised values are ignored like unset ones.
pub fn env_bool(key: &str) -> Option<bool> {
    env_opt(key).and_then(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
