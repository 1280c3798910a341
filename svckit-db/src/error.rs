//! Error types for svckit-db

use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    /// No usable connection string
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A `:name` placeholder has no value in the supplied parameters
    #[error("Missing value for query parameter ':{name}'")]
    MissingParameter { name: String },

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
