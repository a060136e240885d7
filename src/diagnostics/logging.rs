//! Logging-based diagnostic sink

use super::{Diagnostic, DiagnosticSink, Severity};
use tracing::{error, info, warn};

/// Sink that logs diagnostics using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Note => info!("{}", diagnostic.message),
            Severity::Warning => warn!("{}", diagnostic.message),
            Severity::Error => error!("{}", diagnostic.message),
        }
    }
}
