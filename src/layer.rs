use crate::level::Severity;
use crate::logger::SumoLogger;
use crate::record::EventRecord;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

// Diagnostics emitted by the logger itself and by the HTTP stack it drives
// must not be shipped, or every flush would enqueue the next one.
const QUIET_TARGETS: &[&str] = &[
    env!("CARGO_CRATE_NAME"),
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "tower",
    "want",
    "mio",
];

/// Keys of [`EventRecord`] that event fields are not allowed to shadow.
/// Event fields with these names are shipped as `fields.<name>`.
const RESERVED_KEYS: &[&str] = &["time", "level", "msg", "target", "module_path", "file", "line"];

fn is_quiet_target(target: &str) -> bool {
    QUIET_TARGETS.iter().any(|quiet| {
        target
            .strip_prefix(quiet)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// `tracing_subscriber` layer that turns events into Bunyan-shaped
/// records and queues them on a [`SumoLogger`].
///
/// Events less severe than `min_level` are ignored, as are events from
/// this crate and from the HTTP client stack (`reqwest`, `hyper`, `h2`,
/// `rustls`, ...), which fire on every flush. The layer only encodes and
/// enqueues; shipping happens on the logger's timer task.
pub struct SumoLayer {
    logger: SumoLogger,
    min_level: Level,
}

impl SumoLayer {
    pub fn new(logger: SumoLogger, min_level: Level) -> Self {
        SumoLayer { logger, min_level }
    }

    pub fn logger(&self) -> &SumoLogger {
        &self.logger
    }
}

impl<S> Layer<S> for SumoLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.min_level || is_quiet_target(meta.target()) {
            return;
        }

        let mut fields = Map::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let record = EventRecord {
            time: Utc::now(),
            level: Severity::from(meta.level()).code(),
            msg: message.unwrap_or_default(),
            target: meta.target().to_string(),
            module_path: meta.module_path().map(|s| s.to_string()),
            file: meta.file().map(|s| s.to_string()),
            line: meta.line(),
            fields,
        };

        self.logger.write(&record);
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Map<String, Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: Value) {
        let name = field.name();
        let key = if RESERVED_KEYS.contains(&name) {
            format!("fields.{}", name)
        } else {
            name.to_string()
        };
        self.fields.insert(key, value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, Value::String(format!("{:?}", value)));
        }
    }
}
