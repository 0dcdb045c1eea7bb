//! OpenTelemetry span exporter writing JSON lines.
//!
//! Every finished span becomes one self-contained JSON object on its own
//! line, so the file can be followed with `tail -f` and filtered with `jq`:
//!
//! ```json
//! {"service":"tree-explorer","traceId":"…","spanId":"…","parentSpanId":null,
//!  "name":"tree_append","kind":"internal","startTimeUnixNano":"1700000000000000000",
//!  "durationMicros":42,"attributes":{"action":"add","target":"root"},
//!  "events":[{"name":"action appended","timeUnixNano":"…","attributes":{…}}],
//!  "status":{"code":"unset"}}
//! ```

use super::rotating_file::RotatingFile;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, SpanKind, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

/// Span exporter appending one JSON line per span to a rotating file.
pub struct JsonLinesExporter {
    writer: RotatingFile,
    service_name: String,
    is_shutdown: AtomicBool,
}

impl JsonLinesExporter {
    /// Exporter writing to `writer`, tagging records with `service_name`.
    #[must_use]
    pub fn new(writer: RotatingFile, service_name: impl Into<String>) -> Self {
        Self {
            writer,
            service_name: service_name.into(),
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> std::io::Result<()> {
        for span in batch {
            self.writer
                .write_line(&format_span(span, &self.service_name).to_string())?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "exporter is shut down",
            ))));
        }

        let result = self
            .write_batch(&batch)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, res: &Resource) {
        let _ = res;
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("writer", &self.writer)
            .field("service_name", &self.service_name)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Tracer provider exporting synchronously to a JSON-lines file.
#[must_use]
pub fn create_tracer_provider(file_path: PathBuf, service_name: &str) -> TracerProvider {
    let resource = Resource::new(vec![KeyValue::new("service.name", service_name.to_string())]);
    let exporter = JsonLinesExporter::new(RotatingFile::new(file_path), service_name);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

/// One span as a flat JSON object.
fn format_span(span: &SpanData, service_name: &str) -> JsonValue {
    let parent = if span.parent_span_id == SpanId::INVALID {
        JsonValue::Null
    } else {
        JsonValue::String(format!("{:016x}", span.parent_span_id))
    };

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "timeUnixNano": unix_nanos(event.timestamp),
                "attributes": attributes(&event.attributes),
            })
        })
        .collect();

    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO);

    json!({
        "service": service_name,
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "kind": kind_name(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        "attributes": attributes(&span.attributes),
        "events": events,
        "status": status(&span.status),
    })
}

fn unix_nanos(at: SystemTime) -> String {
    at.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

/// Attributes as a JSON object; later duplicates win.
fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let mut map = Map::new();
    for pair in pairs {
        map.insert(pair.key.to_string(), attribute_value(&pair.value));
    }
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!({ "code": "unset" }),
        Status::Ok => json!({ "code": "ok" }),
        Status::Error { description } => json!({ "code": "error", "message": description.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Span as _, Tracer as _, TracerProvider as _};

    #[test]
    fn finished_span_becomes_one_json_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let provider = create_tracer_provider(path.clone(), "tree-explorer-test");
        let tracer = provider.tracer("test");

        let mut span = tracer.start("tree_append");
        span.set_attribute(KeyValue::new("target", "root"));
        span.set_attribute(KeyValue::new("history_len", 3_i64));
        span.end();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let record: JsonValue = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["service"], "tree-explorer-test");
        assert_eq!(record["name"], "tree_append");
        assert_eq!(record["kind"], "internal");
        assert_eq!(record["parentSpanId"], JsonValue::Null);
        assert_eq!(record["attributes"]["target"], "root");
        assert_eq!(record["attributes"]["history_len"], 3);
        assert_eq!(record["status"]["code"], "unset");
    }
}
