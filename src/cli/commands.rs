use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Service provider scanner that writes META-INF/services registry files
#[derive(Parser, Debug)]
#[command(
    name = "service-scanner",
    about = "Discover service providers and write META-INF/services registry files",
    version,
    author,
    long_about = "service-scanner loads type declarations, finds every concrete public class \
                  that transitively implements one of the configured service contracts, and \
                  writes one META-INF/services/<contract> file per contract listing its providers."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan declarations and write service registry files",
        long_about = "Loads declaration files, matches candidate classes against the configured \
                      service contracts and writes META-INF/services/<contract> under the output \
                      directory.\n\n\
                      Examples:\n  \
                      service-scanner scan src-model/ --services com.acme.Plugin\n  \
                      service-scanner scan model.json --services com.acme.Plugin,com.acme.Codec -o target/classes\n  \
                      service-scanner scan model.yaml --classpath deps/ --dry-run --format json"
    )]
    Scan(ScanArgs),

    #[command(
        about = "Validate declaration files",
        long_about = "Loads declaration files and reports the number of types and any supertype \
                      references that do not resolve to a loaded declaration.\n\n\
                      Examples:\n  \
                      service-scanner check src-model/\n  \
                      service-scanner check model.json --classpath deps/ --format yaml"
    )]
    Check(CheckArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(
        value_name = "PATH",
        help = "Declaration files or directories to scan (defaults to current directory)"
    )]
    pub inputs: Vec<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "LIST",
        help = "Comma-separated binary names of the service contracts (overrides SERVICE_SCANNER_SERVICES)"
    )]
    pub services: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory under which META-INF/services is written (overrides SERVICE_SCANNER_OUTPUT_DIR)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Declarations used only to resolve supertypes; never registered (repeatable)"
    )]
    pub classpath: Vec<PathBuf>,

    #[arg(long, help = "Keep writing registry files after one fails")]
    pub keep_going: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Report what would be written without writing files")]
    pub dry_run: bool,

    #[arg(long, help = "Print the effective configuration and exit")]
    pub show_config: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(
        value_name = "PATH",
        required = true,
        help = "Declaration files or directories to check"
    )]
    pub inputs: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Additional declarations used to resolve supertypes (repeatable)"
    )]
    pub classpath: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
