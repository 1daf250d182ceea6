//! Process-wide logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Returns false when a subscriber was already installed, so calling this
/// more than once is harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .is_ok()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init().is_ok()
    };
    if !installed {
        return false;
    }

    // Route `log` records from the db layer; may already be set by try_init.
    let _ = tracing_log::LogTracer::init();

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    true
}
