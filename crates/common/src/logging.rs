use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    init_with_level(&config.level);
}

pub fn init_with_level(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Another subscriber may have raced us in; keep whichever won.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
