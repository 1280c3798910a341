//! Convenience emitters that attach structured fields to a message

use tracing::Level;

use crate::{Fields, LOG_TARGET};

/// Log an error with its display string, type name and extra context.
///
/// Context entries are emitted as top-level fields of the record.
///
/// `error_type` is the short type name of `E` (`DbError`, `Error`, ...).
pub fn log_error<E>(error: &E, context: &Fields)
where
    E: std::error::Error + ?Sized,
{
    tracing::error!(
        target: LOG_TARGET,
        error = %error,
        error_type = short_type_name::<E>(),
        context = %context,
        "Error occurred"
    );
}

pub fn log_info(message: &str, fields: &Fields) {
    emit(Level::INFO, message, fields);
}

pub fn log_debug(message: &str, fields: &Fields) {
    emit(Level::DEBUG, message, fields);
}

pub fn log_warning(message: &str, fields: &Fields) {
    emit(Level::WARN, message, fields);
}

pub(crate) fn emit(level: Level, message: &str, fields: &Fields) {
    // tracing macros need a constant level
    match level {
        Level::ERROR => tracing::error!(target: LOG_TARGET, context = %fields, "{}", message),
        Level::WARN => tracing::warn!(target: LOG_TARGET, context = %fields, "{}", message),
        Level::INFO => tracing::info!(target: LOG_TARGET, context = %fields, "{}", message),
        Level::DEBUG => tracing::debug!(target: LOG_TARGET, context = %fields, "{}", message),
        _ => tracing::trace!(target: LOG_TARGET, context = %fields, "{}", message),
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
