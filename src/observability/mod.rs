//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileExporter → gardenia-otlp.json
//! ```
//!
//! Traces land in `~/.local/share/zellij/gardenia/gardenia-otlp.json` as one
//! OTLP/JSON document per line, rotated at 8 MiB with three numbered backups.
//! Request spans continue across the `web_request` round trip through the
//! trace context stored in the request's context map.
//!
//! # Configuration
//!
//! The filter is taken from the `trace_level` plugin option (an `EnvFilter`
//! directive such as `debug` or `gardenia::layers=trace`), default `info`.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `exporter`: Span exporter and tracer provider
//! - `otlp`: OTLP/JSON encoding
//! - `rotating`: Size-rotated line file

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use init::init_tracing;
