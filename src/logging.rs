//! Logging setup. Trimmed of the teacher's OpenTelemetry exporter wiring
//! (there's no tracing backend to ship spans to here) but keeping
//! `tracing`/`tracing-subscriber` with an `EnvFilter` driven by `RUST_LOG`,
//! the same shape as the teacher's `build_loglevel_filter_layer`.

use tracing_subscriber::EnvFilter;

pub fn build_loglevel_filter_layer() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(build_loglevel_filter_layer())
        .init();
}
