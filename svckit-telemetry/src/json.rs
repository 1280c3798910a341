//! JSON line renderer
//!
//! One object per event: `timestamp`, `level`, `target`, `message` and every
//! event field at the top level. The [`CONTEXT_FIELD`] field carries a
//! [`Fields`](crate::Fields) map rendered as JSON; its entries are merged into
//! the object rather than nested. Merged entries never replace the fixed keys
//! or a field the event set itself.

use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoUtc, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event field whose JSON object is flattened into the record.
pub const CONTEXT_FIELD: &str = "context";

/// [`FormatEvent`] writing JSON lines with caller fields flattened.
#[derive(Debug)]
pub struct JsonLines {
    timer: ChronoUtc,
}

impl Default for JsonLines {
    fn default() -> Self {
        Self {
            timer: ChronoUtc::rfc_3339(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut timestamp = String::new();
        self.timer.format_time(&mut Writer::new(&mut timestamp))?;

        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let mut record = Map::new();
        record.insert("timestamp".into(), Value::String(timestamp));
        record.insert("level".into(), Value::String(metadata.level().to_string()));
        record.insert("target".into(), Value::String(metadata.target().to_owned()));
        for (key, value) in visitor.fields.into_iter().chain(visitor.context) {
            record.entry(key).or_insert(value);
        }

        let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

#[derive(Default)]
struct RecordVisitor {
    fields: Map<String, Value>,
    context: Map<String, Value>,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_owned(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == CONTEXT_FIELD {
            if let Ok(Value::Object(entries)) = serde_json::from_str::<Value>(&rendered) {
                self.context.extend(entries);
                return;
            }
        }
        self.insert(field, Value::String(rendered));
    }
}
