//! Accumulating diagnostic log for a runtime library lookup.
//!
//! Every skip, fallthrough and ambiguity the locator runs into is appended
//! here so a report tool can print the whole story afterwards. Entries are
//! also forwarded to `tracing` at debug level as they are recorded; the
//! caller decides how to render the log itself.
//!
//! The log is an explicit value passed by reference into the locator rather
//! than a process-wide singleton. Appends take a lock, so one log may be
//! shared across threads.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// How much attention a log entry deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Info => write!(f, "{}", self.message),
            Severity::Warning => write!(f, "WARNING: {}", self.message),
        }
    }
}

/// Append-only, ordered collection of [`LogEntry`] values.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational entry.
    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "cudaloc", severity = "info", "{message}");
        self.push(LogEntry {
            message,
            severity: Severity::Info,
        });
    }

    /// Record a warning entry.
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "cudaloc", severity = "warning", "{message}");
        self.push(LogEntry {
            message,
            severity: Severity::Warning,
        });
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Snapshot of the warning entries only.
    pub fn warnings(&self) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.is_warning())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    // A panic while holding the lock cannot leave a Vec half-pushed, so the
    // entries are still usable after poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
