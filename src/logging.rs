// src/logging.rs

//! Tracing subscriber setup for the desktop build
//!
//! Console output and an optional daily-rolling log file, each filtered by
//! `RUST_LOG` when set and by `logging.level` otherwise. The browser build
//! installs `tracing-wasm` from `lib.rs` instead.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::Identity;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// Keeps the file writer flushing until dropped
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Builds the filter directive, `level_override` winning over the config
pub fn filter_directive(config: &LoggingConfig, level_override: Option<tracing::Level>) -> String {
    match level_override {
        Some(level) => level.to_string().to_lowercase(),
        None => config.level.clone(),
    }
}

/// Installs the global subscriber
pub fn init(config: &LoggingConfig, level_override: Option<tracing::Level>) -> Result<LoggingGuard> {
    let directive = filter_directive(config, level_override);
    let filter = if level_override.is_some() {
        EnvFilter::try_new(&directive)
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&directive))
    }
    .map_err(|e| Error::config(format!("Invalid log level '{}': {}", directive, e)))?;

    let registry = Registry::default().with(filter);

    let registry = if config.console.enabled {
        let console_layer = match config.format {
            LogFormat::Json => fmt::layer().json().boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_ansi(config.console.colored)
                .with_target(false)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_ansi(config.console.colored)
                .boxed(),
        };

        registry.with(console_layer)
    } else {
        registry.with(Identity::new().boxed())
    };

    let mut file_guard = None;
    let registry = if let Some(file_config) = &config.file {
        let file_appender = tracing_appender::rolling::daily(
            file_config
                .path
                .parent()
                .unwrap_or_else(|| std::path::Path::new(".")),
            file_config
                .path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("product_studio.log")),
        );

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let file_layer = match config.format {
            LogFormat::Json => fmt::layer().json().with_writer(non_blocking).boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed(),
        };

        registry.with(file_layer)
    } else {
        registry.with(Identity::new().boxed())
    };

    registry
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(LoggingGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_config() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };

        assert_eq!(filter_directive(&config, None), "warn");
        assert_eq!(filter_directive(&config, Some(tracing::Level::DEBUG)), "debug");
    }
}
