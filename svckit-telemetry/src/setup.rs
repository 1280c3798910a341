//! Tracing subscriber setup
//!
//! Installs one process-wide subscriber: level filter, target and level
//! annotation, RFC 3339 UTC timestamps, and either a JSON or a console
//! renderer.
//!
//! Environment variables:
//!   LOG_FORMAT    # `json` for JSON lines, anything else for console output
//!   RUST_LOG      # Log filter (default: info)

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::json::JsonLines;
use crate::{TelemetryError, LOG_TARGET};

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Format chosen by the first successful [`init_with`] call.
static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Final renderer of the logging pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, structured fields at the top level
    Json,
    /// Human-readable console lines
    #[default]
    Console,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Only the exact string `json` selects JSON.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::from_setting(&value))
            .unwrap_or_default()
    }

    pub fn from_setting(value: &str) -> Self {
        if value == "json" {
            Self::Json
        } else {
            Self::Console
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Console => "console",
        }
    }
}

impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_setting(s))
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Explicit filter directive; `None` falls back to `RUST_LOG`, then `info`
    pub filter: Option<String>,
    /// Colorize console output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: None,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            format: LogFormat::from_env(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = Some(directive.into());
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Build the level filter for this configuration.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        match &self.filter {
            Some(directive) => EnvFilter::try_new(directive)
                .map_err(|err| TelemetryError::filter(directive.as_str(), err)),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// Initialize process-wide logging from the environment.
pub fn init() -> Result<LogFormat, TelemetryError> {
    init_with(&TelemetryConfig::from_env())
}

/// Initialize process-wide logging.
///
/// Only the first call installs anything; later calls return the format that
/// was installed first. A subscriber set by the host process before this call
/// is left in place.
pub fn init_with(config: &TelemetryConfig) -> Result<LogFormat, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = config.env_filter()?;
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer(config, std::io::stdout))
                .try_init();

            match installed {
                Ok(()) => tracing::debug!(
                    target: LOG_TARGET,
                    format = %config.format,
                    "Logging initialized"
                ),
                Err(err) => tracing::debug!(
                    target: LOG_TARGET,
                    error = %err,
                    "Global subscriber already set, keeping it"
                ),
            }

            Ok(config.format)
        })
        .copied()
}

/// Build the formatting layer for `config`, writing to `writer`.
pub fn fmt_layer<S, W>(
    config: &TelemetryConfig,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer().with_writer(writer);

    match config.format {
        LogFormat::Json => layer.event_format(JsonLines::default()).boxed(),
        LogFormat::Console => layer
            .with_target(true)
            .with_level(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(config.ansi)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_json_selects_json() {
        assert_eq!(LogFormat::from_setting("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_setting("JSON"), LogFormat::Console);
        assert_eq!(LogFormat::from_setting(" json"), LogFormat::Console);
        assert_eq!(LogFormat::from_setting(""), LogFormat::Console);
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Console));
    }

    #[test]
    fn explicit_filter_is_validated() {
        let config = TelemetryConfig::default().with_filter("svckit=notalevel");
        let err = config.env_filter().unwrap_err();
        assert!(err.to_string().contains("svckit=notalevel"));

        let config = TelemetryConfig::default().with_filter("svckit=debug");
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn init_is_idempotent() {
        let first = init_with(&TelemetryConfig::default().with_format(LogFormat::Json));
        let second = init_with(&TelemetryConfig::default().with_format(LogFormat::Console));

        assert_eq!(first.unwrap(), LogFormat::Json);
        assert_eq!(second.unwrap(), LogFormat::Json);
    }
}
