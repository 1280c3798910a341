//! In-memory log capture for tests
//!
//! Enabled for this crate's own tests and, through the `test-util` feature,
//! for dependent crates.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::setup::{fmt_layer, LogFormat, TelemetryConfig};

/// Collects JSON-formatted log lines in memory.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events on the current thread into this capture until the guard
    /// is dropped.
    pub fn install(&self) -> DefaultGuard {
        let config = TelemetryConfig::default()
            .with_format(LogFormat::Json)
            .with_ansi(false);
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("trace"))
            .with(fmt_layer(&config, self.clone()));

        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }

    /// Every captured line parsed as a JSON object.
    pub fn events(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Captured events whose message starts with `prefix`.
    pub fn events_with_message(&self, prefix: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| {
                event["message"]
                    .as_str()
                    .is_some_and(|message| message.starts_with(prefix))
            })
            .collect()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.buffer).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LOG_TARGET;

    #[test]
    fn captured_lines_carry_the_record_shape() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        tracing::info!(target: LOG_TARGET, user_id = 7, "hello");

        let events = capture.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!(event["timestamp"].as_str().is_some_and(|ts| ts.contains('T')));
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["target"], "svckit");
        assert_eq!(event["message"], "hello");
        assert_eq!(event["user_id"], 7);
    }

    #[test]
    fn capture_is_scoped_to_the_guard() {
        let capture = LogCapture::new();
        {
            let _guard = capture.install();
            tracing::warn!(target: LOG_TARGET, "inside");
        }
        tracing::warn!(target: LOG_TARGET, "outside");

        assert_eq!(capture.events_with_message("inside").len(), 1);
        assert!(capture.events_with_message("outside").is_empty());
    }
}
