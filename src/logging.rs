use tracing_subscriber::EnvFilter;

/// Initialise logging for the demo binary. The default level is `info`;
/// enabling the settings file's debug flag raises it to `debug` and lets
/// `RUST_LOG` override the filter entirely.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        // Ignore RUST_LOG when debug logging is off so a stray environment
        // variable doesn't make the editor chatty.
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
