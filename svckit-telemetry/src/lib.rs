//! svckit-telemetry: process-wide structured logging for backend services
//!
//! One subscriber is installed per process (see [`init`]); everything else in
//! this crate is a thin convenience layer over `tracing` events.
//!
//! ```ignore
//! svckit_telemetry::init()?;
//!
//! let timer = svckit_telemetry::start_timer("import", fields! { "batch" => 7 });
//! // ... work ...
//! let seconds = timer.stop();
//! ```

pub mod error;
pub mod fields;
pub mod json;
pub mod log;
pub mod setup;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod timer;

pub use error::TelemetryError;
pub use fields::Fields;
pub use json::JsonLines;
pub use log::{log_debug, log_error, log_info, log_warning};
pub use setup::{fmt_layer, init, init_with, LogFormat, TelemetryConfig};
pub use timer::{start_timer, Timer};

/// Logger name attached to every event emitted by svckit crates.
pub const LOG_TARGET: &str = "svckit";
