//! service-scanner - service provider discovery and registry file generation
//!
//! Given a set of service contracts (interfaces or base classes named by their
//! binary names) and a model of the declared types, this library finds every
//! concrete, instantiable class that transitively extends or implements a
//! contract and writes `META-INF/services/<contract>` registry files.
//!
//! # Core Concepts
//!
//! - **Type Model**: Declarations loaded from JSON/YAML files, indexed by
//!   binary name (`com.acme.Outer$Inner`)
//! - **Subtype Matching**: Transitive supertype search that tolerates cycles
//! - **Candidates**: Public, non-abstract, top-level or static classes with a
//!   public no-arg constructor
//! - **Lifecycle**: `init → process* → finish`; results accumulate across
//!   rounds and are emitted once
//!
//! # Example Usage
//!
//! ```
//! use service_scanner::diagnostics::CollectingSink;
//! use service_scanner::fs::MockFileSystem;
//! use service_scanner::model::{DeclarationFile, Modifier, Origin, TypeDecl, TypeKind};
//! use service_scanner::{RegistryEmitter, ServiceScanner, TypeModel};
//!
//! let mut model = TypeModel::new();
//! let roots = model
//!     .add_batch(
//!         &DeclarationFile::new(
//!             "com.acme.impl",
//!             vec![TypeDecl::new("FooPlugin", TypeKind::Class)
//!                 .with_modifiers(&[Modifier::Public])
//!                 .with_constructor(&[Modifier::Public], &[])
//!                 .implementing("com.acme.Plugin")],
//!         ),
//!         Origin::Source,
//!     )
//!     .unwrap();
//!
//! let sink = CollectingSink::new();
//! let mut scanner = ServiceScanner::init(Some("com.acme.Plugin"), &sink);
//! scanner.process(&model, &roots).unwrap();
//!
//! let fs = MockFileSystem::new();
//! scanner.finish(&RegistryEmitter::new(&fs, "out")).unwrap();
//! assert_eq!(
//!     fs.contents("out/META-INF/services/com.acme.Plugin").as_deref(),
//!     Some("com.acme.impl.FooPlugin\n")
//! );
//! ```
//!
//! # Project Structure
//!
//! - [`model`]: Declarations, binary names, and the type arena
//! - [`scan`]: Subtype matching, candidate filtering, and the provider registry
//! - [`processor`]: The scanner lifecycle
//! - [`emit`]: Registry file output
//! - [`diagnostics`]: Notes, warnings, and errors reported to the host
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod fs;
pub mod model;
pub mod processor;
pub mod scan;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, ScannerConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use emit::{EmitFailurePolicy, EmitSummary, RegistryEmitter};
pub use model::{BinaryName, LoadError, TypeModel};
pub use processor::{ProcessorError, ProcessorState, ServiceScanner};
pub use scan::{ProviderRegistry, ScanStats, SubtypeMatcher, SupertypeGraph};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_service_scanner() {
        assert_eq!(NAME, "service-scanner");
    }
}
