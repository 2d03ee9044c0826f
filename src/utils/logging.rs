//! # Logging
//!
//! Installs a `tracing-subscriber` formatter as the global default, driven by
//! [`LoggingConfig`]. `RUST_LOG` directives, when set, take precedence over the
//! configured level.
//!
//! Library code never calls this on its own; applications and test binaries opt in.
//! Calling it again after a subscriber is installed is a no-op.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, WireError};

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            WireError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            )
        })?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| WireError::ConfigError(format!("Failed to open log file: {e}")))?;
        let builder = builder.with_writer(Mutex::new(file)).with_ansi(false);
        if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    } else if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match installed {
        Ok(()) => debug!(app = %config.app_name, "Logging initialized"),
        Err(_) => debug!("Global subscriber already installed, keeping it"),
    }
    Ok(())
}
