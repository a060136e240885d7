//! Output formatting for multiple formats
//!
//! Renders scan and check reports as JSON, YAML, or human-readable text.
//! Reports go to stdout; logs and diagnostics go to stderr.
//!
//! # Example
//!
//! ```ignore
//! use service_scanner::cli::output::{OutputFormat, OutputFormatter, ScanReport};
//!
//! let report = ScanReport::new(/* ... */);
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format_scan(&report)?);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ScannerConfig;
use crate::diagnostics::{Diagnostic, Severity};
use crate::emit::EmitSummary;
use crate::scan::{ProviderRegistry, ScanStats};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounts {
    pub notes: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl DiagnosticCounts {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Note => counts.notes += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Error => counts.errors += 1,
            }
        }
        counts
    }
}

/// Everything a `scan` run produced
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub services: ProviderRegistry,
    pub output_dir: PathBuf,
    pub rounds: usize,
    pub files: EmitSummary,
    pub stats: ScanStats,
    pub diagnostic_counts: DiagnosticCounts,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanReport {
    pub fn new(
        services: ProviderRegistry,
        output_dir: PathBuf,
        rounds: usize,
        files: EmitSummary,
        stats: ScanStats,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            services,
            output_dir,
            rounds,
            files,
            stats,
            diagnostic_counts: DiagnosticCounts::from_diagnostics(&diagnostics),
            diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        self.files.is_success()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    #[serde(rename = "type")]
    pub type_name: String,
    pub reference: String,
    /// Set when the reference looks like a nested type written with `.`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_form: Option<String>,
}

/// Result of a `check` run
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub files: usize,
    pub source_types: usize,
    pub classpath_types: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

impl CheckReport {
    pub fn total_types(&self) -> usize {
        self.source_types + self.classpath_types
    }
}

fn rule() -> String {
    "\u{2501}".repeat(42)
}

/// Output formatter for scan and check reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_scan(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize scan report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize scan report to YAML")
            }
            OutputFormat::Human => Ok(self.format_scan_human(report)),
        }
    }

    pub fn format_check(&self, report: &CheckReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize check report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize check report to YAML")
            }
            OutputFormat::Human => Ok(self.format_check_human(report)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &ScannerConfig) -> Result<String> {
        let config_map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_scan_human(&self, report: &ScanReport) -> String {
        let mut output = String::new();

        if !report.is_success() {
            output.push_str("\u{26A0} Service Scan Result (Emission Failed)\n");
        } else if report.files.dry_run {
            output.push_str("\u{2713} Service Scan Result (Dry Run)\n");
        } else {
            output.push_str("\u{2713} Service Scan Result\n");
        }
        output.push_str(&rule());
        output.push_str("\n\n");

        output.push_str(&format!("Output Dir:  {}\n\n", report.output_dir.display()));

        if report.services.is_empty() {
            output.push_str("Services: (none configured)\n\n");
        } else {
            output.push_str("Services:\n");
            let count = report.services.contract_count();
            for (i, (contract, providers)) in report.services.iter().enumerate() {
                let is_last = i == count - 1;
                let connector = if is_last { "\u{2514}" } else { "\u{251C}" };
                let indent = if is_last { "   " } else { "\u{2502}  " };
                output.push_str(&format!(
                    "{}\u{2500} {} ({})\n",
                    connector,
                    contract,
                    providers.len()
                ));
                for (j, provider) in providers.iter().enumerate() {
                    let inner = if j == providers.len() - 1 {
                        "\u{2514}"
                    } else {
                        "\u{251C}"
                    };
                    output.push_str(&format!("{}{}\u{2500} {}\n", indent, inner, provider));
                }
            }
            output.push('\n');
        }

        let verb = if report.files.dry_run {
            "Would write"
        } else {
            "Written"
        };
        output.push_str("Registry Files:\n");
        output.push_str(&format!("\u{251C}\u{2500} {}: {}\n", verb, report.files.written.len()));
        output.push_str(&format!("\u{251C}\u{2500} Failed:  {}\n", report.files.failed.len()));
        output.push_str(&format!("\u{2514}\u{2500} Skipped: {}\n", report.files.skipped.len()));
        for path in &report.files.written {
            output.push_str(&format!("  - {}\n", path.display()));
        }
        output.push('\n');

        output.push_str("Scan Summary:\n");
        output.push_str(&format!("Rounds: {}\n", report.rounds));
        output.push_str(&format!("Types visited: {}\n", report.stats.types_visited));
        output.push_str(&format!("Candidates: {}\n", report.stats.candidates));
        output.push_str(&format!("Registrations: {}\n", report.stats.registrations));
        output.push_str(&format!("Rejected: {}\n", report.stats.rejected.len()));

        let counts = report.diagnostic_counts;
        output.push_str(&format!(
            "\nDiagnostics: {} note(s), {} warning(s), {} error(s)\n",
            counts.notes, counts.warnings, counts.errors
        ));

        let problems: Vec<&Diagnostic> = report
            .diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Note)
            .collect();
        if !problems.is_empty() {
            output.push_str("\n\u{26A0} Problems:\n");
            for diagnostic in problems {
                output.push_str(&format!("  - {}\n", diagnostic));
            }
        }

        output
    }

    fn format_check_human(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        if report.unresolved.is_empty() {
            output.push_str("\u{2713} Declaration Check\n");
        } else {
            output.push_str("\u{26A0} Declaration Check (Unresolved References)\n");
        }
        output.push_str(&rule());
        output.push_str("\n\n");

        output.push_str(&format!("Files:            {}\n", report.files));
        output.push_str(&format!("Types:            {}\n", report.total_types()));
        output.push_str(&format!("\u{251C}\u{2500} Source:       {}\n", report.source_types));
        output.push_str(&format!("\u{2514}\u{2500} Classpath:    {}\n", report.classpath_types));

        if !report.unresolved.is_empty() {
            output.push_str(&format!(
                "\nUnresolved supertype references ({}):\n",
                report.unresolved.len()
            ));
            for unresolved in &report.unresolved {
                output.push_str(&format!(
                    "  - {} -> {}",
                    unresolved.type_name, unresolved.reference
                ));
                if let Some(binary_form) = &unresolved.binary_form {
                    output.push_str(&format!(" (nested types are referenced as {})", binary_form));
                }
                output.push('\n');
            }
        }

        output
    }
}
