use tracing_subscriber::{filter::ParseError, fmt, prelude::*, util::TryInitError, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to create log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to initialize logging: {0}")]
    Init(#[from] TryInitError),
}

/// Initialize logging with environment-based log level filtering.
///
/// Logs go to stderr; stdout is reserved for the runner's answer.
pub fn init_logging(verbose: bool) -> Result<(), LoggingError> {
    let default_level = if verbose { "debug" } else { "info" };

    // RUST_LOG overrides the default level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
