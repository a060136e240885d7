//! Diagnostics reported while scanning and emitting

mod handler;
mod logging;

pub use handler::{CollectingSink, Diagnostic, DiagnosticSink, NoOpSink, Severity};
pub use logging::TracingSink;
