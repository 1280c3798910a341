//! svckit: shared utilities for backend services
//!
//! Re-exports the three leaf crates under short module names:
//!
//! - [`telemetry`]: process-wide structured logging and timers
//! - [`validation`]: format predicates and schema validation
//! - [`db`]: PostgreSQL client with lazy engine and health checks
//!
//! ```ignore
//! svckit::init()?;
//!
//! let client = svckit::db::DatabaseClient::from_env()?;
//! if !client.health_check().await {
//!     svckit::telemetry::log_warning("database unavailable", &Default::default());
//! }
//! ```

pub mod config;

pub use svckit_db as db;
pub use svckit_telemetry as telemetry;
pub use svckit_validation as validation;

pub use config::{load_dotenv, ConfigError, Settings};
pub use svckit_db::{DatabaseClient, DatabaseUtils, DbError, Params};
pub use svckit_telemetry::{fields, Fields, LogFormat};
pub use svckit_validation::{validate_model, Model, ValidationOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors from [`init`]
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
}

/// Load `.env` and install process-wide logging.
///
/// Safe to call more than once; only the first call configures logging.
pub fn init() -> Result<LogFormat, InitError> {
    load_dotenv()?;
    Ok(telemetry::init()?)
}
