//! CLI logic for the seqgen diagram tool.
//!
//! Reads a diagram file, runs it through parse, layout and render, and writes
//! the draw.io document.

mod args;

pub use args::Args;

use std::{fs, io};

use log::{debug, info};

use seqgen_core::{layout, parse, render_with_config, RenderConfig};

/// Failures of a CLI run
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Diagram(#[from] seqgen_core::Error),
}

impl CliError {
    /// Short identifier of the error kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            CliError::Read { .. } => "ReadError",
            CliError::Write { .. } => "WriteError",
            CliError::Diagram(err) => err.kind_name(),
        }
    }

    /// Diagram line the error originates from, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            CliError::Diagram(err) => Some(err.line()),
            CliError::Read { .. } | CliError::Write { .. } => None,
        }
    }
}

/// One line report for the terminal
pub fn report(err: &CliError) -> String {
    format!("{}: {}", err.kind_name(), err)
}

/// Run the seqgen CLI application
///
/// # Errors
///
/// Returns `CliError` for file I/O failures and for the first syntax or
/// layout error in the diagram.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let source = fs::read_to_string(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;

    let statements = parse(&source).map_err(seqgen_core::Error::from)?;
    debug!(statements = statements.len(); "Parsed input");

    let scene = layout(&statements).map_err(seqgen_core::Error::from)?;
    debug!(nodes = scene.nodes.len(); "Laid out scene");

    let config = RenderConfig::default().with_id_prefix(args.id_prefix.as_str());
    let xml = render_with_config(&scene, &config);

    fs::write(&args.output, xml).map_err(|source| CliError::Write {
        path: args.output.clone(),
        source,
    })?;

    info!(output_file = args.output; "draw.io document exported successfully");

    Ok(())
}
