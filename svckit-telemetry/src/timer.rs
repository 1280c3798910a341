//! Operation timing with start/completion log events

use std::time::Instant;

use crate::{Fields, LOG_TARGET};

/// A running operation timer.
///
/// Created by [`start_timer`]; [`Timer::stop`] logs the completion and
/// returns the elapsed wall-clock time in seconds.
#[derive(Debug)]
#[must_use = "a timer only logs completion when stopped"]
pub struct Timer {
    operation: String,
    context: Fields,
    started: Instant,
}

/// Log the start of `operation` and begin timing it.
pub fn start_timer(operation: impl Into<String>, context: Fields) -> Timer {
    Timer::start(operation, context)
}

impl Timer {
    pub fn start(operation: impl Into<String>, context: Fields) -> Self {
        let operation = operation.into();
        let started = Instant::now();
        tracing::info!(
            target: LOG_TARGET,
            operation = %operation,
            context = %context,
            "Starting operation"
        );

        Self {
            operation,
            context,
            started,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Seconds since start, without logging.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Log completion and return the duration in seconds.
    pub fn stop(self) -> f64 {
        let duration = self.elapsed();
        tracing::info!(
            target: LOG_TARGET,
            operation = %self.operation,
            duration,
            context = %self.context,
            "Completed operation"
        );
        duration
    }

    /// Turn the timer into a closure that stops it when called.
    pub fn into_fn(self) -> impl FnOnce() -> f64 {
        move || self.stop()
    }
}
