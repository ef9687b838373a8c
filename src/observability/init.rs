//! Tracing subscriber setup.

use super::exporter;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in trace resources.
const SERVICE_NAME: &str = "gardenia";

/// Level used when the configuration names none.
const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber exporting spans to the trace file.
///
/// The filter comes from `trace_level` in the plugin configuration, falling
/// back to `info`. Tracing is optional: when the data directory cannot be
/// created the plugin runs without a subscriber. Only the first call has an
/// effect.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let data_dir = paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("layers.base_z", i64::from(config.base_z_index)),
    ]);
    let provider = exporter::file_tracer_provider(paths::trace_file(), resource);
    let tracer = provider.tracer(SERVICE_NAME);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer))
        .try_init();
}
