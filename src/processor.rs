//! Scanner lifecycle
//!
//! The host drives `init → process* → finish`. Results accumulate in one
//! [`ProviderRegistry`] across every `process` call and leave through the
//! emitter exactly once.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{parse_services, SERVICES_OPTION};
use crate::diagnostics::DiagnosticSink;
use crate::emit::{EmitSummary, RegistryEmitter};
use crate::model::{TypeId, TypeModel};
use crate::scan::{ProviderRegistry, ScanDriver, ScanStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Initialized,
    Scanning,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Scanner already finished; no further {0} calls are allowed")]
    AlreadyFinished(&'static str),
}

pub struct ServiceScanner<'s> {
    state: ProcessorState,
    registry: ProviderRegistry,
    stats: ScanStats,
    rounds: usize,
    sink: &'s dyn DiagnosticSink,
}

impl<'s> ServiceScanner<'s> {
    /// Reads the `services` option once. A missing or empty value is not an
    /// error: two warnings are reported and every later call is a no-op.
    pub fn init(services: Option<&str>, sink: &'s dyn DiagnosticSink) -> Self {
        let contracts = services.map(parse_services).unwrap_or_default();

        if contracts.is_empty() {
            sink.warning(
                "No services added. Add services by passing their fully qualified binary names in the following format:",
            );
            sink.warning(&format!(
                "--{}=com.example.Service1,com.example.Service2",
                SERVICES_OPTION
            ));
        } else {
            info!(contracts = ?contracts, "Scanning for service providers");
        }

        Self {
            state: ProcessorState::Initialized,
            registry: ProviderRegistry::new(contracts),
            stats: ScanStats::default(),
            rounds: 0,
            sink,
        }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Totals across every round so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Scans one batch of root declarations.
    pub fn process(&mut self, model: &TypeModel, roots: &[TypeId]) -> Result<ScanStats, ProcessorError> {
        if self.state == ProcessorState::Finished {
            return Err(ProcessorError::AlreadyFinished("process"));
        }
        self.state = ProcessorState::Scanning;
        self.rounds += 1;

        if self.registry.is_empty() {
            debug!(round = self.rounds, "No services configured, skipping round");
            return Ok(ScanStats::default());
        }

        let stats = ScanDriver::new(model).scan(roots, &mut self.registry);
        debug!(
            round = self.rounds,
            registrations = stats.registrations,
            "Processed round"
        );
        self.stats.merge(stats.clone());
        Ok(stats)
    }

    /// Hands the registry to the emitter. May only be called once.
    pub fn finish(&mut self, emitter: &RegistryEmitter<'_>) -> Result<EmitSummary, ProcessorError> {
        if self.state == ProcessorState::Finished {
            return Err(ProcessorError::AlreadyFinished("finish"));
        }
        self.state = ProcessorState::Finished;

        let summary = emitter.emit(&self.registry, self.sink);
        info!(
            rounds = self.rounds,
            contracts = self.registry.contract_count(),
            providers = self.registry.provider_count(),
            files = summary.written.len(),
            "Service scan finished"
        );
        Ok(summary)
    }
}
