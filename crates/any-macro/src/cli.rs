//! Command line surface.

use std::path::PathBuf;

use clap::Parser;

/// Parsed command line arguments.
#[derive(Parser, Debug)]
#[command(name = "any-macro")]
#[command(about = "Record command sequences as macros and replay them in order")]
pub struct Cli {
    /// Script of directives to run instead of the interactive prompt
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Configuration file, overriding the platform default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Macro library file, overriding the configured storage path
    #[arg(short, long)]
    pub macros_file: Option<PathBuf>,
}
