use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the veil binary.
#[derive(Parser, Debug)]
#[command(
    name = "veil",
    version,
    about = "Obfuscate JavaScript syntax trees (ESTree JSON in, ESTree JSON out)"
)]
pub struct CliArgs {
    /// ESTree JSON file to obfuscate, or `-` to read standard input.
    pub input: PathBuf,

    /// JSON options file (comments and trailing commas allowed).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Options preset that the config file and flags are applied on top of.
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    pub preset: Preset,

    /// Additional reserved-name pattern (repeatable).
    #[arg(long = "reserved-name", value_name = "PATTERN")]
    pub reserved_names: Vec<String>,

    /// Seed for the random source, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the result here instead of standard output.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,

    /// Use the options exactly as given, without applying the dependency
    /// rules between them.
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// String table with accessor and rotation, console output disabled.
    Default,
    /// Renaming and inline literal encoding only.
    NoCustomNodes,
}

impl CliArgs {
    /// Whether the input is read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
