//! Registry file emission
//!
//! Each configured contract gets `META-INF/services/<contract>` under the
//! output directory: one provider binary name per line, sorted, every line
//! newline-terminated. A contract with no providers still gets an empty file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostics::DiagnosticSink;
use crate::fs::FileSystem;
use crate::scan::ProviderRegistry;

pub const SERVICES_DIR: &str = "META-INF/services";

/// What to do with the remaining contracts after a write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitFailurePolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Report the failure and keep writing the other files.
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
    /// Contracts never attempted because an earlier write aborted emission.
    pub skipped: Vec<String>,
    pub dry_run: bool,
}

impl EmitSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Renders a provider set in registry file format.
pub fn render(providers: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for provider in providers {
        out.push_str(provider);
        out.push('\n');
    }
    out
}

fn format_providers(providers: &BTreeSet<String>) -> String {
    let names: Vec<&str> = providers.iter().map(String::as_str).collect();
    format!("[{}]", names.join(", "))
}

pub struct RegistryEmitter<'a> {
    fs: &'a dyn FileSystem,
    output_dir: PathBuf,
    policy: EmitFailurePolicy,
    dry_run: bool,
}

impl<'a> RegistryEmitter<'a> {
    pub fn new(fs: &'a dyn FileSystem, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_dir: output_dir.into(),
            policy: EmitFailurePolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_policy(mut self, policy: EmitFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reports what would be written without touching the file system.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn registry_path(&self, contract: &str) -> PathBuf {
        self.output_dir.join(SERVICES_DIR).join(contract)
    }

    pub fn emit(&self, registry: &ProviderRegistry, sink: &dyn DiagnosticSink) -> EmitSummary {
        let mut summary = EmitSummary {
            dry_run: self.dry_run,
            ..Default::default()
        };
        let mut aborted = false;

        for (contract, providers) in registry.iter() {
            if aborted {
                summary.skipped.push(contract.to_string());
                continue;
            }

            sink.note(&format!(
                "Found providers {} for service {}",
                format_providers(providers),
                contract
            ));
            let path = self.registry_path(contract);

            if self.dry_run {
                summary.written.push(path);
                continue;
            }

            if self.fs.exists(&path) {
                sink.warning(&format!("Overwriting file {}", path.display()));
            }

            match self.write_file(&path, providers) {
                Ok(()) => {
                    debug!(path = %path.display(), providers = providers.len(), "Wrote registry file");
                    summary.written.push(path);
                }
                Err(e) => {
                    sink.error(&format!("{:#}", e));
                    summary.failed.push(contract.to_string());
                    if self.policy == EmitFailurePolicy::Abort {
                        aborted = true;
                    }
                }
            }
        }

        if !summary.skipped.is_empty() {
            warn!(
                skipped = ?summary.skipped,
                "Registry emission stopped after a write failure"
            );
        }
        summary
    }

    fn write_file(&self, path: &Path, providers: &BTreeSet<String>) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write(path, render(providers).as_bytes())
    }
}
