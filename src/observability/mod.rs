//! Span export for offline debugging.
//!
//! `tracing` spans and events emitted across the crate are bridged into
//! OpenTelemetry and written to a local file, one JSON object per span:
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK tracer → JsonLinesExporter → RotatingFile
//! ```
//!
//! The file rotates at 5 MiB and keeps three numbered backups. The level
//! filter comes from the configured trace level and defaults to `info`.

mod exporter;
mod init;
mod rotating_file;

pub use exporter::{create_tracer_provider, JsonLinesExporter};
pub use init::{init_tracing, SERVICE_NAME, SPAN_FILE_NAME};
pub use rotating_file::RotatingFile;
