//! Error types

use crate::parser::ParseError;

/// Layout validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("participant `{name}` is already declared")]
    DuplicateParticipant { name: String },
    #[error("unknown participant `{name}`")]
    UnknownParticipant { name: String },
    #[error("sender `{name}` must be active to send a message")]
    SenderNotActive { name: String },
    #[error("deactivation not possible, `{name}` is inactive")]
    OverDeactivation { name: String },
    #[error("participants must be inactive at the end: {}", names.join(", "))]
    UnbalancedActivation { names: Vec<String> },
    #[error("no open frame")]
    NoOpenFrame,
    #[error("`else` is only valid inside an alt frame, found {kind}")]
    InvalidBranch { kind: String },
    #[error("{kind} frame `{label}` does not reference any participant")]
    EmptyFrame { kind: String, label: String },
    #[error("unclosed frames: {}", frames.join(", "))]
    UnclosedFrame { frames: Vec<String> },
    #[error("note on `{target}` is missing `end note`")]
    UnterminatedNote { target: String },
    #[error("`end note` without an open note")]
    NoOpenNote,
    #[error("{direction} message does not allow the `{marker}` activation marker")]
    InvalidActivationForFoundLost {
        direction: &'static str,
        marker: &'static str,
    },
    #[error("self call on `{name}` must not carry an activation marker")]
    InvalidActivationForSelfCall { name: String },
    #[error("message between two diagram edges")]
    BoundaryMessage,
    #[error("title may occur only once")]
    DuplicateTitle,
    #[error("{setting} must be {bound}, got {value}")]
    InvalidSize {
        setting: &'static str,
        bound: &'static str,
        value: i32,
    },
}

impl ErrorKind {
    /// Attach the originating statement line
    pub fn at(self, line: usize) -> LayoutError {
        LayoutError { line, kind: self }
    }

    /// Short identifier of the error kind
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateParticipant { .. } => "DuplicateParticipant",
            ErrorKind::UnknownParticipant { .. } => "UnknownParticipant",
            ErrorKind::SenderNotActive { .. } => "SenderNotActive",
            ErrorKind::OverDeactivation { .. } => "OverDeactivation",
            ErrorKind::UnbalancedActivation { .. } => "UnbalancedActivation",
            ErrorKind::NoOpenFrame => "NoOpenFrame",
            ErrorKind::InvalidBranch { .. } => "InvalidBranch",
            ErrorKind::EmptyFrame { .. } => "EmptyFrame",
            ErrorKind::UnclosedFrame { .. } => "UnclosedFrame",
            ErrorKind::UnterminatedNote { .. } => "UnterminatedNote",
            ErrorKind::NoOpenNote => "NoOpenNote",
            ErrorKind::InvalidActivationForFoundLost { .. } => "InvalidActivationForFoundLost",
            ErrorKind::InvalidActivationForSelfCall { .. } => "InvalidActivationForSelfCall",
            ErrorKind::BoundaryMessage => "BoundaryMessage",
            ErrorKind::DuplicateTitle => "DuplicateTitle",
            ErrorKind::InvalidSize { .. } => "InvalidSize",
        }
    }
}

/// Layout error with the line of the statement that caused it
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Layout error at line {line}: {kind}")]
pub struct LayoutError {
    pub line: usize,
    #[source]
    pub kind: ErrorKind,
}

/// Any failure of the text to draw.io pipeline
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl Error {
    /// Source line the error originates from
    pub fn line(&self) -> usize {
        match self {
            Error::Parse(ParseError::SyntaxError { line, .. }) => *line,
            Error::Layout(err) => err.line,
        }
    }

    /// Short identifier of the error kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Parse(_) => "SyntaxError",
            Error::Layout(err) => err.kind.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_display() {
        let err = ErrorKind::OverDeactivation {
            name: "Alice".to_string(),
        }
        .at(2);
        assert_eq!(
            err.to_string(),
            "Layout error at line 2: deactivation not possible, `Alice` is inactive"
        );
        assert_eq!(err.kind.name(), "OverDeactivation");
    }

    #[test]
    fn test_unbalanced_lists_names() {
        let kind = ErrorKind::UnbalancedActivation {
            names: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(kind.to_string(), "participants must be inactive at the end: A, B");
    }

    #[test]
    fn test_invalid_size_display() {
        let kind = ErrorKind::InvalidSize {
            setting: "participant width",
            bound: "positive",
            value: -50,
        };
        assert_eq!(kind.to_string(), "participant width must be positive, got -50");
        assert_eq!(kind.name(), "InvalidSize");
    }

    #[test]
    fn test_error_line_and_kind() {
        let err: Error = ErrorKind::NoOpenFrame.at(7).into();
        assert_eq!(err.line(), 7);
        assert_eq!(err.kind_name(), "NoOpenFrame");
    }
}
