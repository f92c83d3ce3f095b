//! seqgen-core: sequence diagram text to draw.io
//!
//! The pipeline has three stages. [`parse`] turns text into statements,
//! [`layout`] validates them and positions every element, and
//! [`render`] writes the resulting scene as a draw.io document.
//!
//! # Example
//!
//! ```
//! use seqgen_core::generate;
//!
//! let input = r#"
//! title Example
//! participant Alice
//! participant Bob
//! Alice ->+ Bob: Hello
//! Bob -->>- Alice: Hi there
//! "#;
//!
//! let xml = generate(input).unwrap();
//! assert!(xml.contains("Hello"));
//! ```
//!
//! # Working with the scene
//!
//! ```
//! use seqgen_core::{layout_with_config, parse, render_with_config, LayoutConfig, RenderConfig};
//!
//! let statements = parse("participant A\nactivate A\nA -> self: think\ndeactivate A").unwrap();
//! let config = LayoutConfig::default().with_statement_offset(20.0);
//! let scene = layout_with_config(&statements, config).unwrap();
//! assert_eq!(scene.messages().count(), 1);
//!
//! let xml = render_with_config(&scene, &RenderConfig::default().with_id_prefix("doc-"));
//! assert!(xml.contains(r#"id="doc-1""#));
//! ```

pub mod ast;
pub mod drawio;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod parser;
pub mod scene;

use log::{debug, info};

pub use ast::*;
pub use drawio::{render, render_with_config, RenderConfig};
pub use error::{Error, ErrorKind, LayoutError};
pub use layout::{layout, layout_with_config, LayoutConfig};
pub use parser::{parse, ParseError};
pub use scene::Scene;

/// Parse, lay out and render in one go with default configuration
pub fn generate(input: &str) -> Result<String, Error> {
    let statements = parse(input)?;
    debug!(statements = statements.len(); "Parsed input");

    let scene = layout(&statements)?;
    info!(nodes = scene.nodes.len(); "Diagram laid out");

    Ok(render(&scene))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reports_parse_errors() {
        let err = generate("participant A\n???").unwrap_err();
        assert_eq!(err.kind_name(), "SyntaxError");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_generate_reports_layout_errors() {
        let err = generate("participant A\nparticipant A").unwrap_err();
        assert_eq!(err.kind_name(), "DuplicateParticipant");
        assert_eq!(err.line(), 2);
    }
}
