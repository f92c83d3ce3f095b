use std::{fs, path::PathBuf};

use tempfile::tempdir;

use seqgen_cli::{report, run, Args, CliError};

/// Collects all .seq files from a directory
fn collect_seq_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("seq"))
                .collect()
        })
        .unwrap_or_default();

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        id_prefix: "test-".to_string(),
        log_level: "off".to_string(),
    }
}

#[test]
fn test_demos_render() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    // Demos live at the workspace root
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("demos");
    let demos = collect_seq_files(demos_path);
    assert!(!demos.is_empty(), "No demos found in demos/");

    for demo in &demos {
        let output = temp_dir
            .path()
            .join(format!("{}.drawio", demo.file_stem().unwrap().to_string_lossy()));
        let args = args(&demo.to_string_lossy(), &output.to_string_lossy());

        if let Err(err) = run(&args) {
            panic!("{} failed: {}", demo.display(), report(&err));
        }

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.starts_with("<mxfile"), "{}", demo.display());
        assert!(xml.contains(r#"id="test-1""#));
    }
}

#[test]
fn test_layout_error_is_reported_with_line() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("broken.seq");
    let output = temp_dir.path().join("broken.drawio");
    fs::write(&input, "participant A\nparticipant B\nA -> B\n").unwrap();

    let err = run(&args(&input.to_string_lossy(), &output.to_string_lossy())).unwrap_err();
    assert_eq!(err.kind_name(), "SenderNotActive");
    assert_eq!(err.line(), Some(3));
    assert_eq!(
        report(&err),
        "SenderNotActive: Layout error at line 3: sender `A` must be active to send a message"
    );
    assert!(!output.exists());
}

#[test]
fn test_syntax_error() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("syntax.seq");
    fs::write(&input, "participant A\n\nA => A\n").unwrap();

    let err = run(&args(&input.to_string_lossy(), "unused.drawio")).unwrap_err();
    assert_eq!(err.kind_name(), "SyntaxError");
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_missing_input() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("missing.seq");

    let err = run(&args(&input.to_string_lossy(), "unused.drawio")).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert_eq!(err.line(), None);
    assert!(report(&err).starts_with("ReadError: failed to read"));
}
