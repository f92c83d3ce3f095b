//! Command-line argument definitions for the seqgen CLI.

use clap::Parser;

/// Command-line arguments for the seqgen diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output draw.io file
    #[arg(short, long, default_value = "out.drawio")]
    pub output: String,

    /// Prefix of the generated cell ids
    #[arg(long, env = "SEQGEN_ID_PREFIX", default_value = "seqgen-")]
    pub id_prefix: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
