use parking_lot::Mutex;
use tracing::error;

/// Receives unexpected failures for operator visibility.
pub trait DiagnosticSink: Send + Sync {
    fn error(&self, message: &str, cause: &anyhow::Error);
}

/// Forwards diagnostics to the global tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn error(&self, message: &str, cause: &anyhow::Error) {
        error!("{} {:#}", message, cause);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub message: String,
    pub cause: String,
}

/// Keeps diagnostics in memory, e.g. to surface them in a report.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn error(&self, message: &str, cause: &anyhow::Error) {
        self.records.lock().push(DiagnosticRecord {
            message: message.to_string(),
            cause: format!("{:#}", cause),
        });
    }
}
