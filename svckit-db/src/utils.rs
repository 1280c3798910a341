//! Connection-string resolution and one-shot connectivity checks

use crate::{DatabaseClient, DbError, DbResult};

/// Environment variable holding the connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Utility functions for common database operations
pub struct DatabaseUtils;

impl DatabaseUtils {
    /// Read the connection string from `DATABASE_URL`.
    ///
    /// An unset or empty variable is a configuration error.
    pub fn get_connection_string() -> DbResult<String> {
        match std::env::var(DATABASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Ok(url),
            _ => Err(DbError::config(format!(
                "{DATABASE_URL_ENV} environment variable not set"
            ))),
        }
    }

    /// Check connectivity with a throwaway client.
    ///
    /// Any failure, including an unusable connection string, yields `false`.
    pub async fn test_connection(connection_string: &str) -> bool {
        match DatabaseClient::new(Some(connection_string)) {
            Ok(client) => client.health_check().await,
            Err(err) => {
                tracing::debug!(
                    target: svckit_telemetry::LOG_TARGET,
                    error = %err,
                    "Connection test skipped"
                );
                false
            }
        }
    }
}
