// SiteLog - platform/sink.rs
//
// Output channels for formatted records. A sink receives one
// severity-tagged string per call and never sees more than
// `MAX_CHUNK_CHARS` characters at once; chunking happens upstream.
//
// Variants:
//   - TracingSink: forwards into the installed `tracing` subscriber.
//   - StdoutSink: `D/Tag: message` lines on standard output.
//   - MemorySink: keeps records in memory (tests, embedding).

use crate::core::model::Severity;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for formatted log records.
pub trait Sink: Send + Sync {
    fn write(&self, severity: Severity, tag: &str, message: &str);
}

/// Choose the sink for this process: the tracing sink when a global
/// subscriber is installed, standard output otherwise.
///
/// The probe runs once when a logger is built; the choice is fixed for the
/// logger's lifetime.
pub fn probe_sink() -> Arc<dyn Sink> {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("Global tracing subscriber found; using tracing sink");
        Arc::new(TracingSink)
    } else {
        Arc::new(StdoutSink)
    }
}

// =============================================================================
// Tracing
// =============================================================================

/// Emits each record as a `tracing` event with target `sitelog` and the tag
/// as a field. `Assert` maps to ERROR with `assert = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        match severity {
            Severity::Verbose => tracing::trace!(target: "sitelog", tag, "{message}"),
            Severity::Debug => tracing::debug!(target: "sitelog", tag, "{message}"),
            Severity::Info => tracing::info!(target: "sitelog", tag, "{message}"),
            Severity::Warn => tracing::warn!(target: "sitelog", tag, "{message}"),
            Severity::Error => tracing::error!(target: "sitelog", tag, "{message}"),
            Severity::Assert => {
                tracing::error!(target: "sitelog", tag, assert = true, "{message}")
            }
        }
    }
}

// =============================================================================
// Standard output
// =============================================================================

/// Writes `<letter>/<tag>: <message>` to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the caller down with it.
        let _ = writeln!(out, "{}/{tag}: {message}", severity.short_label());
    }
}

// =============================================================================
// Memory
// =============================================================================

/// One call received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRecord {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// Collects every call in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<SinkRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages received so far, without severity or tag.
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain all records.
    pub fn take(&self) -> Vec<SinkRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for MemorySink {
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SinkRecord {
                severity,
                tag: tag.to_string(),
                message: message.to_string(),
            });
    }
}
