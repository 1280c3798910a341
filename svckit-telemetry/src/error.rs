//! Error types for svckit-telemetry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    /// `RUST_LOG` (or an explicit filter) could not be parsed
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
}

impl TelemetryError {
    pub fn filter(
        directive: impl Into<String>,
        source: tracing_subscriber::filter::ParseError,
    ) -> Self {
        Self::Filter {
            directive: directive.into(),
            source,
        }
    }
}
