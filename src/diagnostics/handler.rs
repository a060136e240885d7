//! Diagnostic sink trait and records

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Fire-and-forget receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    fn note(&self, message: &str) {
        self.report(Diagnostic::new(Severity::Note, message));
    }

    fn warning(&self, message: &str) {
        self.report(Diagnostic::new(Severity::Warning, message));
    }

    fn error(&self, message: &str) {
        self.report(Diagnostic::new(Severity::Error, message));
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl DiagnosticSink for NoOpSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Sink that keeps every diagnostic, optionally forwarding to another sink
#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<Diagnostic>>,
    forward: Option<Box<dyn DiagnosticSink>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarding(inner: Box<dyn DiagnosticSink>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            forward: Some(inner),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .map(|records| records.iter().filter(|d| d.severity == severity).count())
            .unwrap_or(0)
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message)
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        if let Some(inner) = &self.forward {
            inner.report(diagnostic.clone());
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(diagnostic);
        }
    }
}
