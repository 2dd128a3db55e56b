//! Subscriber setup for binaries and tests embedding the crate.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the host. [`init_logging`] is a convenience for hosts that
//! keep their settings in [`LoggingConfig`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. If a global
/// subscriber is already installed the call leaves it in place and
/// succeeds.
///
/// # Errors
///
/// Returns [`Error::Config`] for an unknown level or format.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level: tracing::Level = config
        .level
        .parse()
        .map_err(|_| Error::Config(format!("unknown log level '{}'", config.level)))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format.as_str() {
        "text" => registry.with(fmt::layer()).try_init(),
        "json" => registry.with(fmt::layer().json()).try_init(),
        other => return Err(Error::Config(format!("unknown log format '{other}'"))),
    };

    match installed {
        Ok(()) => tracing::debug!(level = %level, format = %config.format, "logging initialized"),
        Err(err) => tracing::debug!(%err, "global subscriber already installed"),
    }
    Ok(())
}
