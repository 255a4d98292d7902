use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var naming a log file; logs go to stderr when unset.
pub const LOG_FILE_ENV: &str = "FLAGSCOPE_LOG";

/// Initialize tracing.
///
/// The filter comes from `RUST_LOG` (default `warn`). When `FLAGSCOPE_LOG`
/// names a file, logs are appended there without ANSI colors so stdout stays
/// clean for flag output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(log_path) = std::env::var_os(LOG_FILE_ENV) else {
        init_stderr(filter);
        return;
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            init_stderr(filter);
            tracing::warn!(
                path = %std::path::Path::new(&log_path).display(),
                error = %e,
                "Failed to open log file, logging to stderr"
            );
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn init_stderr(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
