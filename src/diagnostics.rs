//! Diagnostics sinks used by the corpus builder, stitcher, and validator.
//!
//! Every generator owns an `Arc<dyn Diagnostics>` instead of writing to a
//! process-wide logger. `TracingDiagnostics` forwards to `tracing`;
//! `RecordingDiagnostics` keeps entries in memory so tests can assert on them.

use std::sync::Mutex;

use tracing::{debug, error, warn};

use crate::types::LogMessage;

/// Severity of a diagnostic entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Detail useful while inspecting a run.
    Debug,
    /// Advisory condition; the operation still succeeded.
    Warning,
    /// The operation failed; the caller also receives an error value.
    Error,
}

/// Explicit sink for non-fatal diagnostics.
pub trait Diagnostics: Send + Sync {
    /// Record a diagnostic at `level`.
    fn emit(&self, level: DiagnosticLevel, message: &str);

    /// Record a debug entry.
    fn debug(&self, message: &str) {
        self.emit(DiagnosticLevel::Debug, message);
    }

    /// Record an advisory warning.
    fn warn(&self, message: &str) {
        self.emit(DiagnosticLevel::Warning, message);
    }

    /// Record an error that is also returned to the caller.
    fn error(&self, message: &str) {
        self.emit(DiagnosticLevel::Error, message);
    }
}

/// Forwards diagnostics to the `tracing` subscriber installed by the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: DiagnosticLevel, message: &str) {
        match level {
            DiagnosticLevel::Debug => debug!(target: "regdispatch", "{message}"),
            DiagnosticLevel::Warning => warn!(target: "regdispatch", "{message}"),
            DiagnosticLevel::Error => error!(target: "regdispatch", "{message}"),
        }
    }
}

/// In-memory sink that records every entry in emission order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<(DiagnosticLevel, LogMessage)>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<(DiagnosticLevel, LogMessage)> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: DiagnosticLevel) -> Vec<LogMessage> {
        self.entries()
            .into_iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Recorded warning messages.
    pub fn warnings(&self) -> Vec<LogMessage> {
        self.messages_at(DiagnosticLevel::Warning)
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, level: DiagnosticLevel, message: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order_and_filters_by_level() {
        let sink = RecordingDiagnostics::new();
        sink.debug("first");
        sink.warn("second");
        sink.error("third");
        sink.warn("fourth");

        let entries = sink.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], (DiagnosticLevel::Debug, "first".to_string()));
        assert_eq!(sink.warnings(), vec!["second", "fourth"]);
        assert_eq!(sink.messages_at(DiagnosticLevel::Error), vec!["third"]);
    }

    #[test]
    fn tracing_sink_accepts_all_levels_without_subscriber() {
        let sink = TracingDiagnostics;
        sink.debug("debug entry");
        sink.warn("warn entry");
        sink.error("error entry");
    }
}
