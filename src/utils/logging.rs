use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Defaults to "info" if `RUST_LOG` is not set.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")); // Default to INFO level

    fmt()
        .with_env_filter(filter)
        .init();

    tracing::debug!("Logging setup complete.");
}

/// Runs one pipeline stage for a document and logs how long it took.
///
/// This is the instrumentation boundary: core components never time themselves,
/// the orchestration layer wraps each stage call with this instead.
pub fn timed<T>(stage: &str, document: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    tracing::debug!(
        stage,
        document,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Stage finished"
    );
    out
}
