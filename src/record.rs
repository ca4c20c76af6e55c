use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Bunyan-shaped record built from a `tracing` event.
///
/// `level` holds the numeric Bunyan code so that the logger's level
/// rewriting produces the same output as for records from any other
/// producer. Event fields are flattened next to the fixed keys.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub time: DateTime<Utc>,
    pub level: u64,
    pub msg: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
