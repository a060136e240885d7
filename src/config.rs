//! Configuration management for service-scanner
//!
//! Settings load from environment variables with sensible defaults; CLI
//! flags override them.
//!
//! # Environment Variables
//!
//! - `SERVICE_SCANNER_SERVICES`: comma-separated contract binary names - default: none
//! - `SERVICE_SCANNER_OUTPUT_DIR`: root under which `META-INF/services` is written - default: "."
//! - `SERVICE_SCANNER_LOG_LEVEL`: logging level - default: "info"
//! - `SERVICE_SCANNER_KEEP_GOING`: keep emitting after a write failure (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use service_scanner::ScannerConfig;
//!
//! let mut config = ScannerConfig::default();
//! config.services = Some("com.acme.Plugin,com.acme.Codec".to_string());
//! config.validate().expect("Invalid configuration");
//! assert_eq!(config.contracts(), vec!["com.acme.Codec", "com.acme.Plugin"]);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::emit::EmitFailurePolicy;
use crate::model::{BinaryName, NameError};

/// Name of the option carrying the contract list
pub const SERVICES_OPTION: &str = "services";

const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_KEEP_GOING: bool = false;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid service name '{name}': {source}")]
    InvalidService {
        name: String,
        #[source]
        source: NameError,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Splits a `services` option value into a sorted, duplicate-free contract list.
///
/// Entries are trimmed and empty entries are dropped.
pub fn parse_services(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Raw `services` option value
    pub services: Option<String>,

    pub output_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Keep writing other registry files after one fails
    pub keep_going: bool,
}

impl Default for ScannerConfig {
    /// Loads from `SERVICE_SCANNER_*` environment variables, falling back to defaults.
    fn default() -> Self {
        let services = env::var("SERVICE_SCANNER_SERVICES")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let output_dir = env::var("SERVICE_SCANNER_OUTPUT_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let log_level = env::var("SERVICE_SCANNER_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let keep_going = env::var("SERVICE_SCANNER_KEEP_GOING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_KEEP_GOING);

        Self {
            services,
            output_dir,
            log_level,
            keep_going,
        }
    }
}

impl ScannerConfig {
    /// Configured contracts, sorted and deduplicated. Empty when unset.
    pub fn contracts(&self) -> Vec<String> {
        self.services
            .as_deref()
            .map(parse_services)
            .unwrap_or_default()
    }

    pub fn failure_policy(&self) -> EmitFailurePolicy {
        if self.keep_going {
            EmitFailurePolicy::Continue
        } else {
            EmitFailurePolicy::Abort
        }
    }

    /// Checks contract names and log level.
    ///
    /// An empty contract list is valid; the scanner warns about it at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for contract in self.contracts() {
            BinaryName::parse(&contract).map_err(|source| ConfigError::InvalidService {
                name: contract.clone(),
                source,
            })?;
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Output directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(SERVICES_OPTION.to_string(), self.contracts().join(","));
        map.insert(
            "output_dir".to_string(),
            self.output_dir.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("keep_going".to_string(), self.keep_going.to_string());

        map
    }
}

impl fmt::Display for ScannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Service Scanner Configuration:")?;
        let contracts = self.contracts();
        if contracts.is_empty() {
            writeln!(f, "  Services: (none)")?;
        } else {
            writeln!(f, "  Services:")?;
            for contract in &contracts {
                writeln!(f, "    - {}", contract)?;
            }
        }
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Keep Going: {}", self.keep_going)?;
        Ok(())
    }
}
