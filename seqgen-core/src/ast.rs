//! Statement records produced by the parser and consumed by the layouter

/// A single parsed statement tagged with its source line
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// 1-based source line number
    pub line: usize,
    /// What the statement says
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(line: usize, kind: StatementKind) -> Self {
        Self { line, kind }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `title <text>`
    Title { text: String },
    /// `title width <n>`
    TitleWidth(i32),
    /// `title height <n>`
    TitleHeight(i32),
    /// `participant <name> [as <alias>]`
    Participant { name: String, alias: Option<String> },
    /// `participant width <n>`, applies to participants declared afterwards
    ParticipantWidth(i32),
    /// `participant spacing <n>`, applies to participants declared afterwards
    ParticipantSpacing(i32),
    /// `activate A, B`
    Activate { targets: Vec<String> },
    /// `deactivate A, B`
    Deactivate { targets: Vec<String> },
    /// Message between two endpoints
    Message(Message),
    /// `opt`, `alt`, `loop` or `group` with its label
    FrameOpen { kind: FrameKind, label: String },
    /// `else <label>` inside an alt frame
    Else { label: String },
    /// `end`
    End,
    /// `extend <n>`: widen the innermost frame to the right (positive) or left (negative)
    Extend(i32),
    /// Note header; block notes have `text: None` and collect the following lines
    Note(Note),
    /// One raw line inside a note block
    NoteLine(String),
    /// `end note`
    EndNote,
    /// `space <n>`: permanent vertical displacement
    Space(i32),
}

/// Message statement
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Endpoint,
    pub receiver: Endpoint,
    pub arrow: Arrow,
    pub activation: ActivationEffect,
    /// Label lines (`\n` escapes already split)
    pub text: Vec<String>,
}

/// One side of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Declared participant name or alias
    Named(String),
    /// `found left` / `found right`
    Found(Side),
    /// `lost left` / `lost right`
    Lost(Side),
    /// `self`, the self-call short form (receiver only)
    Myself,
}

impl Endpoint {
    pub fn named(name: impl Into<String>) -> Self {
        Endpoint::Named(name.into())
    }
}

/// Diagram edge used by found/lost messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Arrow style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrow {
    /// Line style
    pub line: LineStyle,
    /// Arrowhead style
    pub head: ArrowHead,
}

impl Arrow {
    pub const SYNC: Arrow = Arrow {
        line: LineStyle::Solid,
        head: ArrowHead::Closed,
    };

    pub const SYNC_OPEN: Arrow = Arrow {
        line: LineStyle::Solid,
        head: ArrowHead::Open,
    };

    pub const RESPONSE: Arrow = Arrow {
        line: LineStyle::Dashed,
        head: ArrowHead::Closed,
    };

    pub const RESPONSE_OPEN: Arrow = Arrow {
        line: LineStyle::Dashed,
        head: ArrowHead::Open,
    };
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Solid line (`->`)
    Solid,
    /// Dashed line (`-->`)
    Dashed,
}

/// Arrowhead style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    /// Closed arrowhead (`->`)
    Closed,
    /// Open arrowhead (`->>`)
    Open,
}

/// Activation marker following the arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationEffect {
    /// No marker
    #[default]
    None,
    /// `+`: activate the receiver
    Activate,
    /// `-`: deactivate the sender
    Deactivate,
    /// `|`: activate the receiver for the duration of the message only
    FireAndForget,
}

impl ActivationEffect {
    pub fn marker(&self) -> &'static str {
        match self {
            ActivationEffect::None => "",
            ActivationEffect::Activate => "+",
            ActivationEffect::Deactivate => "-",
            ActivationEffect::FireAndForget => "|",
        }
    }
}

/// Frame kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Opt,
    Alt,
    Loop,
    Group,
}

impl FrameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Opt => "opt",
            FrameKind::Alt => "alt",
            FrameKind::Loop => "loop",
            FrameKind::Group => "group",
        }
    }
}

/// Note statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Note {
    /// Participant the note is attached to
    pub target: String,
    pub dx: Option<i32>,
    pub dy: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Inline text (`note A: text`); `None` for block notes
    pub text: Option<Vec<String>>,
}
