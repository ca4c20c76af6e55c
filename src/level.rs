use serde_json::Value;

/// Bunyan-style numeric severity levels understood by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Numeric code as it appears in a record's `level` field.
    pub fn code(self) -> u64 {
        match self {
            Severity::Trace => 10,
            Severity::Debug => 20,
            Severity::Info => 30,
            Severity::Warn => 40,
            Severity::Error => 50,
            Severity::Fatal => 60,
        }
    }

    /// Human-readable name written in place of the numeric code.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Look up a severity by its exact numeric code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            10 => Some(Severity::Trace),
            20 => Some(Severity::Debug),
            30 => Some(Severity::Info),
            40 => Some(Severity::Warn),
            50 => Some(Severity::Error),
            60 => Some(Severity::Fatal),
            _ => None,
        }
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// Replace a numeric `level` field with its name.
///
/// Only objects with a `level` holding a known code are touched. Anything
/// else (scalars, missing field, strings, unmapped codes) is left as is.
/// Returns whether the value was rewritten.
pub fn rewrite_level(value: &mut Value) -> bool {
    let Some(level) = value.as_object_mut().and_then(|obj| obj.get_mut("level")) else {
        return false;
    };

    match level_code(level).and_then(Severity::from_code) {
        Some(severity) => {
            *level = Value::String(severity.name().to_string());
            true
        }
        None => false,
    }
}

// JSON numbers may arrive as floats (`30.0`); only integral values count.
fn level_code(level: &Value) -> Option<u64> {
    if let Some(code) = level.as_u64() {
        return Some(code);
    }
    level
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0)
        .map(|f| f as u64)
}
