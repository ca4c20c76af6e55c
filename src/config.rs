use serde::Deserialize;
use std::time::Duration;

use crate::env::{
    env_bool, env_opt, env_parse, SUMO_LOG_COLLECTOR_ENV, SUMO_LOG_ENDPOINT_ENV, SUMO_LOG_MAX_LINES_ENV,
    SUMO_LOG_REWRITE_LEVELS_ENV, SUMO_LOG_SYNC_INTERVAL_MS_ENV,
};
use crate::error::BuildError;

pub const DEFAULT_ENDPOINT: &str = "https://endpoint1.collection.us2.sumologic.com/receiver/v1/http/";
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_LINES: usize = 100;

/// Raw logger options, as a caller or a config file would supply them.
///
/// Every field is optional here; [`LoggerConfig::from_options`] applies
/// defaults and rejects a missing collector.
///
/// ```
/// let opts: sumo_log_sink::config::LoggerOptions =
///     serde_json::from_str(r#"{ "collector": "KEY", "maxLines": 50 }"#).unwrap();
/// assert_eq!(opts.max_lines, Some(50));
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerOptions {
    pub collector: Option<String>,
    pub endpoint: Option<String>,
    /// Flush interval in milliseconds.
    pub sync_interval: Option<u64>,
    pub max_lines: Option<usize>,
    pub rewrite_levels: Option<bool>,
}

impl LoggerOptions {
    pub fn new(collector: impl Into<String>) -> Self {
        LoggerOptions {
            collector: Some(collector.into()),
            ..Default::default()
        }
    }

    /// Read options from the `SUMO_LOG_*` environment variables.
    ///
    /// Empty variables count as unset, and values that don't parse are
    /// ignored so the default applies.
    pub fn from_env() -> Self {
        LoggerOptions {
            collector: env_opt(SUMO_LOG_COLLECTOR_ENV),
            endpoint: env_opt(SUMO_LOG_ENDPOINT_ENV),
            sync_interval: env_parse(SUMO_LOG_SYNC_INTERVAL_MS_ENV),
            max_lines: env_parse(SUMO_LOG_MAX_LINES_ENV),
            rewrite_levels: env_bool(SUMO_LOG_REWRITE_LEVELS_ENV),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the flush interval.
    ///
    /// The interval is kept in whole milliseconds: non-zero durations below
    /// 1 ms are rounded up to 1 ms, and `Duration::ZERO` means "use the
    /// default".
    pub fn sync_interval(mut self, interval: Duration) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.sync_interval = Some(if interval.is_zero() { 0 } else { millis.max(1) });
        self
    }

    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn rewrite_levels(mut self, enabled: bool) -> Self {
        self.rewrite_levels = Some(enabled);
        self
    }
}

/// Validated logger configuration.
///
/// **Fields**
/// - `collector_url`: endpoint with the collector key appended; every
///   batch is POSTed here.
/// - `sync_interval`: period of the flush timer. The first flush happens
///   one full period after the logger is created.
/// - `max_lines`: upper bound on lines per request.
/// - `rewrite_levels`: replace numeric Bunyan `level` codes with names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    pub collector_url: String,
    pub sync_interval: Duration,
    pub max_lines: usize,
    pub rewrite_levels: bool,
}

impl LoggerConfig {
    /// Apply defaults to `opts`.
    ///
    /// Zero values for the interval and batch size are treated as unset.
    pub fn from_options(opts: LoggerOptions) -> Result<Self, BuildError> {
        let collector = opts
            .collector
            .filter(|c| !c.is_empty())
            .ok_or(BuildError::MissingCollector)?;

        let endpoint = opts
            .endpoint
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let sync_interval = opts
            .sync_interval
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SYNC_INTERVAL);

        let max_lines = opts
            .max_lines
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_LINES);

        Ok(LoggerConfig {
            collector_url: format!("{}{}", endpoint, collector),
            sync_interval,
            max_lines,
            rewrite_levels: opts.rewrite_levels.unwrap_or(true),
        })
    }
}
