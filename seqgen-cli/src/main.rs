//! seqgen CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{debug, error, info, LevelFilter};

use seqgen_cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting seqgen");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = seqgen_cli::run(&args) {
        error!(kind = err.kind_name(), line:? = err.line(); "Diagram generation failed");
        eprintln!("{}", seqgen_cli::report(&err));
        process::exit(1);
    }

    info!("Completed successfully");
}
