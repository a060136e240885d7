pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CheckArgs, CliArgs, Commands, OutputFormatArg, ScanArgs};
pub use handlers::{handle_check, handle_scan};
pub use output::{CheckReport, OutputFormat, OutputFormatter, ScanReport};
