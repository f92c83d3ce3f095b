//! Scene graph handed to renderers
//!
//! Every node carries absolute coordinates. Renderers map nodes to drawing
//! primitives and make no layout decisions of their own.

use crate::ast::{ArrowHead, FrameKind, LineStyle};
use crate::geometry::{Point, Rect};

/// Laid out diagram
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Nodes in drawing order
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn lanes(&self) -> impl Iterator<Item = &LaneHeader> {
        self.nodes.iter().filter_map(|node| match node {
            Node::LaneHeader(lane) => Some(lane),
            _ => None,
        })
    }

    pub fn activation_bars(&self) -> impl Iterator<Item = &ActivationBar> {
        self.nodes.iter().filter_map(|node| match node {
            Node::ActivationBar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageArrow> {
        self.nodes.iter().filter_map(|node| match node {
            Node::MessageArrow(message) => Some(message),
            _ => None,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = &FrameBox> {
        self.nodes.iter().filter_map(|node| match node {
            Node::FrameBox(frame) => Some(frame),
            _ => None,
        })
    }

    pub fn dividers(&self) -> impl Iterator<Item = &BranchDivider> {
        self.nodes.iter().filter_map(|node| match node {
            Node::BranchDivider(divider) => Some(divider),
            _ => None,
        })
    }

    pub fn notes(&self) -> impl Iterator<Item = &NoteBox> {
        self.nodes.iter().filter_map(|node| match node {
            Node::NoteBox(note) => Some(note),
            _ => None,
        })
    }

    pub fn title(&self) -> Option<&TitleBox> {
        self.nodes.iter().find_map(|node| match node {
            Node::TitleBox(title) => Some(title),
            _ => None,
        })
    }
}

/// Drawable node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    LaneHeader(LaneHeader),
    ActivationBar(ActivationBar),
    MessageArrow(MessageArrow),
    FrameBox(FrameBox),
    BranchDivider(BranchDivider),
    NoteBox(NoteBox),
    TitleBox(TitleBox),
}

/// Participant lane: header box plus lifeline down to the end of the diagram
#[derive(Debug, Clone, PartialEq)]
pub struct LaneHeader {
    pub index: usize,
    /// Identity used in statements (alias if present)
    pub id: String,
    /// Display label
    pub label: String,
    /// Whole lane, from the header top to the end of the lifeline
    pub rect: Rect,
    /// Height of the header box
    pub header_height: f64,
}

/// Activation rectangle on a lane
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationBar {
    /// Lane index of the owning participant
    pub lane: usize,
    /// Stack position, 0 for the outermost activation
    pub depth: usize,
    pub rect: Rect,
}

/// What a message arrow connects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Between two declared participants
    Regular,
    /// From a participant to itself
    SelfCall,
    /// From a diagram edge
    Found,
    /// To a diagram edge
    Lost,
}

/// Message arrow
#[derive(Debug, Clone, PartialEq)]
pub struct MessageArrow {
    pub kind: MessageKind,
    pub from: Point,
    pub to: Point,
    /// Intermediate points (self calls loop out to the right)
    pub waypoints: Vec<Point>,
    pub line: LineStyle,
    pub head: ArrowHead,
    pub text: Vec<String>,
}

/// Frame around a group of statements
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBox {
    pub kind: FrameKind,
    pub label: String,
    pub rect: Rect,
    /// Size of the kind tab in the top-left corner
    pub tab_width: f64,
    pub tab_height: f64,
    /// Nesting depth, 0 for top-level frames
    pub depth: usize,
}

/// Dashed divider between two alt branches
#[derive(Debug, Clone, PartialEq)]
pub struct BranchDivider {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Note box
#[derive(Debug, Clone, PartialEq)]
pub struct NoteBox {
    /// Lane the note is attached to, `None` for diagram edges
    pub lane: Option<usize>,
    pub rect: Rect,
    pub text: Vec<String>,
}

/// Title frame around the whole diagram
#[derive(Debug, Clone, PartialEq)]
pub struct TitleBox {
    pub text: String,
    pub rect: Rect,
    pub tab_width: f64,
    pub tab_height: f64,
}
