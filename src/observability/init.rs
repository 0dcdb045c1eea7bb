//! Tracing subscriber setup.

use super::exporter::create_tracer_provider;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name spans are reported under.
pub const SERVICE_NAME: &str = "tree-explorer";

/// File the span exporter writes to, inside the data directory.
pub const SPAN_FILE_NAME: &str = "tree-explorer-spans.jsonl";

/// Level filter used when none is configured.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// The `EnvFilter` directive for `config`.
fn filter_directive(config: &Config) -> String {
    config
        .trace_level
        .clone()
        .unwrap_or_else(|| DEFAULT_TRACE_LEVEL.to_string())
}

/// Installs the global subscriber.
///
/// Spans matching the level filter (an [`EnvFilter`] directive such as
/// `"debug"` or `"tree_explorer::app=trace"`, default `"info"`) are written
/// as JSON lines to `<data dir>/tree-explorer-spans.jsonl`.
///
/// Tracing is optional: if the data directory cannot be created nothing is
/// installed, and calls after the first successful one have no effect.
///
/// ```rust,no_run
/// use tree_explorer::observability::init_tracing;
/// use tree_explorer::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = filter_directive(config);

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let provider = create_tracer_provider(data_dir.join(SPAN_FILE_NAME), SERVICE_NAME);
    let tracer = provider.tracer(SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(provider);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(tracer));

    let _ = subscriber.try_init();
}
