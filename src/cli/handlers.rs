//! Subcommand handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 on load or
//! configuration errors and when any registry file failed to emit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use super::commands::{CheckArgs, ScanArgs};
use super::output::{CheckReport, OutputFormatter, ScanReport, UnresolvedReference};
use crate::config::ScannerConfig;
use crate::diagnostics::{CollectingSink, TracingSink};
use crate::emit::RegistryEmitter;
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::{
    discover_declaration_files, load_batches, nested_binary_form, Batch, Origin, TypeModel,
};
use crate::processor::ServiceScanner;

struct LoadedModel {
    model: TypeModel,
    sources: Vec<Batch>,
    files: usize,
}

/// Loads classpath declarations first so source supertypes resolve against them.
fn load_model(fs: &dyn FileSystem, inputs: &[PathBuf], classpath: &[PathBuf]) -> Result<LoadedModel> {
    let mut model = TypeModel::new();
    let mut files = 0;

    if !classpath.is_empty() {
        let classpath_files =
            discover_declaration_files(classpath).context("Failed to discover classpath declarations")?;
        files += classpath_files.len();
        load_batches(fs, &mut model, &classpath_files, Origin::Classpath)
            .context("Failed to load classpath declarations")?;
    }

    let source_files =
        discover_declaration_files(inputs).context("Failed to discover source declarations")?;
    files += source_files.len();
    let sources = load_batches(fs, &mut model, &source_files, Origin::Source)
        .context("Failed to load source declarations")?;

    Ok(LoadedModel {
        model,
        sources,
        files,
    })
}

/// Environment configuration with command-line overrides applied.
fn scan_config(args: &ScanArgs) -> ScannerConfig {
    let mut config = ScannerConfig::default();
    if let Some(services) = &args.services {
        config.services = Some(services.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if args.keep_going {
        config.keep_going = true;
    }
    config
}

fn default_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    if inputs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        inputs.to_vec()
    }
}

pub fn handle_scan(args: &ScanArgs) -> i32 {
    match run_scan(args) {
        Ok(code) => code,
        Err(e) => {
            error!("Scan failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run_scan(args: &ScanArgs) -> Result<i32> {
    let config = scan_config(args);
    config.validate().context("Invalid configuration")?;
    debug!(config = ?config, "Effective configuration");

    let formatter = OutputFormatter::new(args.format.into());
    if args.show_config {
        println!("{}", formatter.format_config(&config)?);
        return Ok(0);
    }

    let fs = RealFileSystem::new();
    let inputs = default_inputs(&args.inputs);
    let loaded = load_model(&fs, &inputs, &args.classpath)?;

    let sink = CollectingSink::forwarding(Box::new(TracingSink));
    let mut scanner = ServiceScanner::init(config.services.as_deref(), &sink);

    for batch in &loaded.sources {
        debug!(path = %batch.path.display(), "Scanning batch");
        scanner.process(&loaded.model, &batch.roots)?;
    }

    let emitter = RegistryEmitter::new(&fs, config.output_dir.clone())
        .with_policy(config.failure_policy())
        .with_dry_run(args.dry_run);
    let summary = scanner.finish(&emitter)?;

    let report = ScanReport::new(
        scanner.registry().clone(),
        config.output_dir.clone(),
        scanner.rounds(),
        summary,
        scanner.stats().clone(),
        sink.diagnostics(),
    );
    println!("{}", formatter.format_scan(&report)?);

    if report.is_success() {
        Ok(0)
    } else {
        error!(
            failed = ?report.files.failed,
            skipped = ?report.files.skipped,
            "Some registry files were not written"
        );
        Ok(1)
    }
}

/// Unresolved supertype references, with the `$` form suggested for
/// references that read like nested types in source form.
fn unresolved_report(model: &TypeModel) -> Vec<UnresolvedReference> {
    model
        .unresolved_references()
        .into_iter()
        .map(|(type_name, reference)| {
            let binary_form = nested_binary_form(&reference);
            if let Some(suggested) = &binary_form {
                warn!(
                    type_name = %type_name,
                    reference = %reference,
                    suggested = %suggested,
                    "Unresolved reference looks like a nested type in source form"
                );
            }
            UnresolvedReference {
                type_name,
                reference,
                binary_form,
            }
        })
        .collect()
}

pub fn handle_check(args: &CheckArgs) -> i32 {
    match run_check(args) {
        Ok(code) => code,
        Err(e) => {
            error!("Check failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    let fs = RealFileSystem::new();
    let loaded = load_model(&fs, &args.inputs, &args.classpath)?;

    let (source_types, classpath_types) =
        loaded
            .model
            .iter()
            .fold((0, 0), |(source, classpath), (_, node)| match node.origin {
                Origin::Source => (source + 1, classpath),
                Origin::Classpath => (source, classpath + 1),
            });

    let unresolved = unresolved_report(&loaded.model);

    info!(
        files = loaded.files,
        types = loaded.model.len(),
        unresolved = unresolved.len(),
        "Declarations checked"
    );

    let report = CheckReport {
        files: loaded.files,
        source_types,
        classpath_types,
        unresolved,
    };
    println!(
        "{}",
        OutputFormatter::new(args.format.into()).format_check(&report)?
    );
    Ok(0)
}
