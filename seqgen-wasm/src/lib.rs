//! WebAssembly bindings for seqgen

use wasm_bindgen::prelude::*;

/// Convert a sequence diagram to a draw.io document
///
/// # Arguments
/// * `input` - The sequence diagram source
///
/// # Returns
/// The draw.io XML, or the error message including its line number
#[wasm_bindgen]
pub fn render(input: &str) -> Result<String, String> {
    seqgen_core::generate(input).map_err(|e| e.to_string())
}

/// Convert a sequence diagram using a fixed cell id prefix
///
/// Editors reloading the output keep their selection stable when ids do not
/// change between runs.
#[wasm_bindgen]
pub fn render_with_prefix(input: &str, id_prefix: &str) -> Result<String, String> {
    let statements = seqgen_core::parse(input).map_err(|e| e.to_string())?;
    let scene = seqgen_core::layout(&statements).map_err(|e| e.to_string())?;
    let config = seqgen_core::RenderConfig::default().with_id_prefix(id_prefix);
    Ok(seqgen_core::render_with_config(&scene, &config))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let result = render("participant Alice\nparticipant Bob\nAlice ->+ Bob: Hello\nBob -->- Alice");
        let xml = result.unwrap();
        assert!(xml.contains("<mxfile"));
        assert!(xml.contains("Hello"));
    }

    #[test]
    fn test_render_error_message() {
        let err = render("participant Alice\ndeactivate Alice").unwrap_err();
        assert!(err.starts_with("Layout error at line 2"));
    }

    #[test]
    fn test_render_with_prefix() {
        let xml = render_with_prefix("participant A", "page-").unwrap();
        assert!(xml.contains(r#"id="page-2""#));
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
