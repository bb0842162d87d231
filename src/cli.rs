use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Top-level CLI definition. Running with no arguments writes `docs/arbol.txt`
/// for the current directory using the host's listing utility.
#[derive(Parser, Debug)]
#[command(
    name = "arbol",
    version,
    about = "Write a timestamped directory tree snapshot to docs/arbol.txt"
)]
pub struct Cli {
    /// Change into this directory before generating the report.
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    /// How the tree listing is produced.
    #[arg(long = "backend", value_enum, default_value_t = Backend::System)]
    pub backend: Backend,
    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Listing backends selectable from the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    /// Invoke the operating system's recursive listing utility.
    System,
    /// Walk the tree in-process.
    Native,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::System => "system",
            Backend::Native => "native",
        }
    }
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
