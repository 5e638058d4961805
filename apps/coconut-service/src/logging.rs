//! # Tracing Setup
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages (takes precedence)
//! - `COCONUT_LOG` / `[logging] filter` - used when `RUST_LOG` is unset
//! - Default: `info,coconut=debug,sqlx=warn`

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Builds the filter: `RUST_LOG` first, then the configured directive.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the global tracing subscriber.
///
/// Logs go to stderr so binaries can print JSON on stdout. Calling this more
/// than once is a no-op.
pub fn init_tracing(settings: &LoggingSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
