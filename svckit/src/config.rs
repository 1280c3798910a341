//! Process configuration sources
//!
//! Services read `DATABASE_URL`, `LOG_FORMAT` and `RUST_LOG` from the
//! environment. A `.env` file can seed them; values already set in the
//! environment are never overwritten.

use std::path::{Path, PathBuf};

use svckit_db::DATABASE_URL_ENV;
use svckit_telemetry::{LogFormat, LOG_TARGET};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load {path:?}: {source}")]
    Dotenv {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

/// Load `.env` from the current directory (or its ancestors) if one exists.
///
/// Returns the loaded path. A missing file is not an error; a malformed one
/// is.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(target: LOG_TARGET, "Loaded .env from {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.not_found() => {
            debug!(target: LOG_TARGET, "No .env file found, using environment only");
            Ok(None)
        }
        Err(source) => Err(ConfigError::Dotenv {
            path: PathBuf::from(".env"),
            source,
        }),
    }
}

/// Load a specific env file.
pub fn load_dotenv_from(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    dotenvy::from_path(path).map_err(|source| ConfigError::Dotenv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: LOG_TARGET, "Loaded env file {}", path.display());
    Ok(())
}

/// Snapshot of the settings svckit reads from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var(DATABASE_URL_ENV)
                .ok()
                .filter(|url| !url.is_empty()),
            log_format: LogFormat::from_env(),
        }
    }
}
