//! Diagnostic logging setup.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Settings;

/// Level used when `RUST_LOG` is unset.
pub const fn default_level(settings: &Settings) -> &'static str {
    if settings.debug {
        "debug"
    } else if settings.verbose {
        "info"
    } else {
        "warn"
    }
}

/// Installs the global subscriber writing to stderr.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(settings)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}
