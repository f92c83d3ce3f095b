//! Single pass statement interpreter

use std::slice;

use log::{debug, trace};

use crate::ast::*;
use crate::error::{ErrorKind, LayoutError};
use crate::geometry::{widen, Cursor, Point, Rect, Span};
use crate::scene::*;

use super::activation::ActivationTracker;
use super::config::LayoutConfig;
use super::frame::FrameStack;
use super::gaps::GapTracker;
use super::registry::{Lane, Registry};

/// Interpreter state for one layout run
///
/// A `Layouter` is consumed by [`Layouter::run`]; independent runs share
/// nothing and may happen in parallel.
pub struct Layouter {
    config: LayoutConfig,
    cursor: Cursor,
    registry: Registry,
    activations: ActivationTracker,
    frames: FrameStack,
    gaps: GapTracker,
    title: Option<String>,
    title_width: f64,
    title_height: f64,
    /// Nodes emitted while walking the statements
    body: Vec<Node>,
    /// Horizontal extent of everything drawn so far
    extent: Option<Span>,
    messages: usize,
    /// Line of the statement being processed
    line: usize,
}

impl Layouter {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            cursor: Cursor::new(config.start_y()),
            registry: Registry::new(
                config.participant_width,
                config.participant_spacing,
                config.boundary_offset,
            ),
            activations: ActivationTracker::new(
                config.activation_width,
                config.activation_stack_offset,
            ),
            frames: FrameStack::new(
                config.frame_padding,
                config.frame_box_width,
                config.frame_box_height,
            ),
            gaps: GapTracker::new(config.start_y()),
            title: None,
            title_width: config.title_box_width,
            title_height: config.title_box_height,
            body: Vec::new(),
            extent: None,
            messages: 0,
            line: 0,
            config,
        }
    }

    /// Interpret all statements and produce the scene
    pub fn run(mut self, statements: &[Statement]) -> Result<Scene, LayoutError> {
        self.registry.plan(statements);
        let mut iter = statements.iter();

        while let Some(statement) = iter.next() {
            trace!(line = statement.line; "Processing statement");
            self.line = statement.line;
            self.process(statement, &mut iter)
                .map_err(|kind| kind.at(statement.line))?;
        }

        self.finish()
    }

    fn process(
        &mut self,
        statement: &Statement,
        rest: &mut slice::Iter<'_, Statement>,
    ) -> Result<(), ErrorKind> {
        match &statement.kind {
            StatementKind::Title { text } => self.handle_title(text),
            StatementKind::TitleWidth(width) => {
                self.title_width = positive("title width", *width)?;
                Ok(())
            }
            StatementKind::TitleHeight(height) => {
                self.title_height = positive("title height", *height)?;
                Ok(())
            }
            StatementKind::Participant { name, alias } => {
                self.handle_participant(name, alias.as_deref())
            }
            StatementKind::ParticipantWidth(width) => {
                self.registry
                    .set_width(positive("participant width", *width)?);
                Ok(())
            }
            StatementKind::ParticipantSpacing(spacing) => {
                self.registry
                    .set_spacing(non_negative("participant spacing", *spacing)?);
                Ok(())
            }
            StatementKind::Activate { targets } => self.handle_activate(targets),
            StatementKind::Deactivate { targets } => self.handle_deactivate(targets),
            StatementKind::Message(message) => self.handle_message(message),
            StatementKind::FrameOpen { kind, label } => {
                self.handle_frame_open(*kind, label);
                Ok(())
            }
            StatementKind::Else { label } => self.handle_else(label),
            StatementKind::End => self.handle_end(),
            StatementKind::Extend(delta) => self.frames.extend(f64::from(*delta)),
            StatementKind::Note(note) => self.handle_note(note, rest),
            StatementKind::NoteLine(_) | StatementKind::EndNote => Err(ErrorKind::NoOpenNote),
            StatementKind::Space(delta) => {
                self.cursor.displace(f64::from(*delta));
                Ok(())
            }
        }
    }

    fn handle_title(&mut self, text: &str) -> Result<(), ErrorKind> {
        if self.title.is_some() {
            return Err(ErrorKind::DuplicateTitle);
        }
        self.title = Some(text.to_string());
        Ok(())
    }

    fn handle_participant(&mut self, name: &str, alias: Option<&str>) -> Result<(), ErrorKind> {
        let participant = self.registry.declare(name, alias)?;
        let (index, span, center_x) = (participant.index, participant.span(), participant.center_x());
        debug!(participant = name, lane = index; "Declared participant");

        let id = alias.unwrap_or(name);
        self.activations.add_lane(id, center_x);
        widen(&mut self.extent, span);
        Ok(())
    }

    fn handle_activate(&mut self, targets: &[String]) -> Result<(), ErrorKind> {
        let y = self.cursor.current();
        for target in targets {
            let index = self.resolve_participant(target)?;
            self.activations.activate(index, y, None, self.line);
            self.reference(Lane::Participant(index));
        }
        self.cursor.advance(self.config.statement_offset);
        Ok(())
    }

    fn handle_deactivate(&mut self, targets: &[String]) -> Result<(), ErrorKind> {
        let y = self.cursor.current();
        for target in targets {
            let index = self.resolve_participant(target)?;
            let bar = self.activations.deactivate(index, y)?;
            self.body.push(Node::ActivationBar(bar));
            self.reference(Lane::Participant(index));
        }
        self.cursor.advance(self.config.statement_offset);
        Ok(())
    }

    fn handle_message(&mut self, message: &Message) -> Result<(), ErrorKind> {
        let sender = self.resolve_endpoint(&message.sender)?;
        let receiver = match &message.receiver {
            Endpoint::Myself => sender,
            other => self.resolve_endpoint(other)?,
        };
        let effect = message.activation;

        let kind = match (sender, receiver) {
            (Lane::Boundary(_), Lane::Boundary(_)) => return Err(ErrorKind::BoundaryMessage),
            (Lane::Boundary(_), Lane::Participant(_)) => {
                if !matches!(effect, ActivationEffect::None | ActivationEffect::Activate) {
                    return Err(ErrorKind::InvalidActivationForFoundLost {
                        direction: "found",
                        marker: effect.marker(),
                    });
                }
                MessageKind::Found
            }
            (Lane::Participant(_), Lane::Boundary(_)) => {
                if !matches!(effect, ActivationEffect::None | ActivationEffect::Deactivate) {
                    return Err(ErrorKind::InvalidActivationForFoundLost {
                        direction: "lost",
                        marker: effect.marker(),
                    });
                }
                MessageKind::Lost
            }
            (Lane::Participant(s), Lane::Participant(r)) if s == r => {
                if effect != ActivationEffect::None {
                    return Err(ErrorKind::InvalidActivationForSelfCall {
                        name: self.registry.describe(sender),
                    });
                }
                MessageKind::SelfCall
            }
            (Lane::Participant(_), Lane::Participant(_)) => MessageKind::Regular,
        };

        if let Lane::Participant(index) = sender {
            let first_with_effect = self.messages == 0 && effect != ActivationEffect::None;
            if !self.activations.is_active(index) && !first_with_effect {
                return Err(ErrorKind::SenderNotActive {
                    name: self.registry.describe(sender),
                });
            }
        }

        debug!(sender:?, receiver:?, marker = effect.marker(); "Laying out message");

        let arrow = match (kind, sender) {
            (MessageKind::SelfCall, Lane::Participant(index)) => self.self_call(index, message)?,
            _ => self.straight_message(kind, sender, receiver, message)?,
        };
        self.body.push(Node::MessageArrow(arrow));
        self.messages += 1;
        self.cursor.advance(self.config.statement_offset);
        Ok(())
    }

    fn straight_message(
        &mut self,
        kind: MessageKind,
        sender: Lane,
        receiver: Lane,
        message: &Message,
    ) -> Result<MessageArrow, ErrorKind> {
        let rightwards = self.registry.order(receiver) > self.registry.order(sender);
        let room = self.label_room(&message.text);

        let (from_x, to_x, y) = match message.activation {
            ActivationEffect::None => {
                let y = self.clear_gaps(sender, receiver, room, 0.0);
                (self.attach_x(sender, rightwards), self.attach_x(receiver, !rightwards), y)
            }
            ActivationEffect::Activate => {
                let y = self.clear_gaps(sender, receiver, room, 0.0);
                let from_x = self.attach_x(sender, rightwards);
                if let Lane::Participant(index) = receiver {
                    let activator = self.registry.order(sender);
                    self.activations.activate(index, y, Some(activator), self.line);
                }
                (from_x, self.attach_x(receiver, !rightwards), y)
            }
            ActivationEffect::Deactivate => {
                let y = self.clear_gaps(sender, receiver, room, 0.0);
                let from_x = self.attach_x(sender, rightwards);
                if let Lane::Participant(index) = sender {
                    let bar = self.activations.deactivate(index, y)?;
                    self.body.push(Node::ActivationBar(bar));
                }
                (from_x, self.attach_x(receiver, !rightwards), y)
            }
            ActivationEffect::FireAndForget => {
                let offset = self.config.statement_offset;
                let start = self.clear_gaps(sender, receiver, room, offset);
                let activator = self.registry.order(sender);
                if let Lane::Participant(index) = receiver {
                    self.activations.activate(index, start, Some(activator), self.line);
                }
                let y = self.cursor.advance(offset);
                let from_x = self.attach_x(sender, rightwards);
                let to_x = self.attach_x(receiver, !rightwards);
                let end = self.cursor.advance(offset);
                if let Lane::Participant(index) = receiver {
                    let bar = self.activations.deactivate(index, end)?;
                    self.body.push(Node::ActivationBar(bar));
                }
                (from_x, to_x, y)
            }
        };

        self.reference(sender);
        self.reference(receiver);

        Ok(MessageArrow {
            kind,
            from: Point::new(from_x, y),
            to: Point::new(to_x, y),
            waypoints: Vec::new(),
            line: message.arrow.line,
            head: message.arrow.head,
            text: message.text.clone(),
        })
    }

    fn self_call(&mut self, index: usize, message: &Message) -> Result<MessageArrow, ErrorKind> {
        let lane = Lane::Participant(index);
        let offset = self.config.statement_offset;

        let top = self.cursor.advance(offset);
        let from_x = self.activations.attach_x(index, true);
        self.activations.activate(index, top, None, self.line);
        let to_x = self.activations.attach_x(index, true);

        let center_x = self.registry.center_x(lane);
        let loop_x = center_x + self.activations.top_dx(index).unwrap_or(0.0) + self.config.self_call_width;
        let extra = self.label_room(&message.text) - self.config.message_spacing;

        let from = Point::new(from_x, top - offset);
        let to = Point::new(to_x, top + offset + extra);
        let waypoints = vec![Point::new(loop_x, from.y), Point::new(loop_x, to.y)];

        let end = self.cursor.advance(2.0 * offset + extra);
        let bar = self.activations.deactivate(index, end)?;
        self.body.push(Node::ActivationBar(bar));

        self.reference(lane);
        self.reference_span(Span::new(center_x, loop_x));

        Ok(MessageArrow {
            kind: MessageKind::SelfCall,
            from,
            to,
            waypoints,
            line: message.arrow.line,
            head: message.arrow.head,
            text: message.text.clone(),
        })
    }

    fn handle_frame_open(&mut self, kind: FrameKind, label: &str) {
        let y = self.cursor.advance(self.config.statement_offset);
        self.frames.open(kind, label, y, self.line);
        debug!(kind = kind.as_str(), label = label, depth = self.frames.depth(); "Opened frame");
        let top = self
            .cursor
            .advance(self.config.frame_box_height + self.config.frame_label_height);
        self.gaps.reset(top);
    }

    fn handle_else(&mut self, label: &str) -> Result<(), ErrorKind> {
        let y = self.cursor.advance(self.config.statement_offset);
        self.frames.add_branch(label, y)?;
        let top = self.cursor.advance(self.config.frame_label_height);
        self.gaps.reset(top);
        Ok(())
    }

    fn handle_end(&mut self) -> Result<(), ErrorKind> {
        let y = self.cursor.advance(self.config.statement_offset);
        let closed = self.frames.close_innermost(y)?;
        debug!(kind = closed.frame.kind.as_str(), branches = closed.dividers.len(); "Closed frame");

        widen(&mut self.extent, closed.frame.rect.span());
        self.body.push(Node::FrameBox(closed.frame));
        self.body
            .extend(closed.dividers.into_iter().map(Node::BranchDivider));
        let below = self.cursor.advance(self.config.statement_offset);
        self.gaps.reset(below);
        Ok(())
    }

    fn handle_note(
        &mut self,
        note: &Note,
        rest: &mut slice::Iter<'_, Statement>,
    ) -> Result<(), ErrorKind> {
        let text = match &note.text {
            Some(text) => text.clone(),
            None => collect_note_lines(&note.target, rest)?,
        };

        let index = self.resolve_participant(&note.target)?;
        let lane = Lane::Participant(index);

        let x = self.registry.center_x(lane) + f64::from(note.dx.unwrap_or(0));
        let y = self.cursor.offset(f64::from(note.dy.unwrap_or(0)));
        let width = match note.width {
            Some(width) => positive("note width", width)?,
            None => self.config.note_width,
        };
        let height = match note.height {
            Some(height) => positive("note height", height)?,
            None => self.config.note_height,
        };
        let rect = Rect::new(x, y, width, height);

        self.reference(lane);
        self.reference_span(rect.span());
        self.body.push(Node::NoteBox(NoteBox {
            lane: Some(index),
            rect,
            text,
        }));
        Ok(())
    }

    /// Check the end state and assemble the scene
    ///
    /// Leftover activations and frames are reported on the statement that
    /// opened the most recent of them.
    fn finish(mut self) -> Result<Scene, LayoutError> {
        if !self.activations.all_inactive() {
            let line = self.activations.last_open_line().unwrap_or(self.line);
            return Err(ErrorKind::UnbalancedActivation {
                names: self.activations.still_active(),
            }
            .at(line));
        }
        if !self.frames.is_empty() {
            let line = self.frames.innermost_line().unwrap_or(self.line);
            return Err(ErrorKind::UnclosedFrame {
                frames: self.frames.open_frames(),
            }
            .at(line));
        }

        let bottom = self.cursor.advance(2.0 * self.config.statement_offset);
        let mut nodes = Vec::with_capacity(self.body.len() + self.registry.len() + 1);

        if let Some(text) = self.title.take() {
            nodes.push(Node::TitleBox(self.title_box(text, bottom)));
        }

        for participant in self.registry.participants() {
            nodes.push(Node::LaneHeader(LaneHeader {
                index: participant.index,
                id: participant.id().to_string(),
                label: participant.name.clone(),
                rect: self.registry.lane_rect(participant.index, bottom),
                header_height: self.config.participant_box_height,
            }));
        }

        nodes.append(&mut self.body);
        debug!(nodes = nodes.len(), height = bottom; "Layout finished");
        Ok(Scene { nodes })
    }

    fn title_box(&self, text: String, bottom: f64) -> TitleBox {
        let padding = self.config.title_padding;
        let span = self
            .extent
            .unwrap_or_else(|| Span::new(0.0, self.title_width));

        let x = span.min - padding;
        let y = -padding - self.title_height;
        TitleBox {
            text,
            rect: Rect::new(x, y, span.max + padding - x, bottom - y + padding),
            tab_width: self.title_width,
            tab_height: self.title_height,
        }
    }

    fn resolve_participant(&self, name: &str) -> Result<usize, ErrorKind> {
        match self.registry.resolve(name)? {
            Lane::Participant(index) => Ok(index),
            Lane::Boundary(_) => Err(ErrorKind::UnknownParticipant {
                name: name.to_string(),
            }),
        }
    }

    fn resolve_endpoint(&self, endpoint: &Endpoint) -> Result<Lane, ErrorKind> {
        match endpoint {
            Endpoint::Named(name) => self.registry.resolve(name),
            Endpoint::Found(side) | Endpoint::Lost(side) => Ok(Lane::Boundary(*side)),
            Endpoint::Myself => Err(ErrorKind::UnknownParticipant {
                name: "self".to_string(),
            }),
        }
    }

    fn attach_x(&self, lane: Lane, right_side: bool) -> f64 {
        match lane {
            Lane::Participant(index) => self.activations.attach_x(index, right_side),
            Lane::Boundary(_) => self.registry.center_x(lane),
        }
    }

    /// Move the cursor down until `room` above the arrow is clear of earlier
    /// messages crossing any of the same gaps
    ///
    /// The arrow is drawn `dy` below the returned position.
    fn clear_gaps(&mut self, sender: Lane, receiver: Lane, room: f64, dy: f64) -> f64 {
        let (a, b) = (self.registry.order(sender), self.registry.order(receiver));
        let free = self.cursor.current() - self.gaps.occupied(a, b);
        let required = room - dy;
        if free < required {
            self.cursor
                .advance(round_up(required - free, self.config.statement_offset));
        }

        let y = self.cursor.current();
        self.gaps.occupy(a, b, y + dy);
        y
    }

    /// Vertical room needed before a message with the given label
    fn label_room(&self, text: &[String]) -> f64 {
        let extra_lines = text.len().saturating_sub(1) as f64;
        self.config.message_spacing + extra_lines * self.config.line_height
    }

    fn reference(&mut self, lane: Lane) {
        let span = self.registry.span(lane);
        self.reference_span(span);
    }

    fn reference_span(&mut self, span: Span) {
        self.frames.reference(span);
        widen(&mut self.extent, span);
    }
}

/// Round `value` up to a whole number of `step`s
fn round_up(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).ceil() * step
    } else {
        value
    }
}

/// Size setting that must be greater than zero
fn positive(setting: &'static str, value: i32) -> Result<f64, ErrorKind> {
    if value > 0 {
        Ok(f64::from(value))
    } else {
        Err(ErrorKind::InvalidSize {
            setting,
            bound: "positive",
            value,
        })
    }
}

/// Size setting that may be zero
fn non_negative(setting: &'static str, value: i32) -> Result<f64, ErrorKind> {
    if value >= 0 {
        Ok(f64::from(value))
    } else {
        Err(ErrorKind::InvalidSize {
            setting,
            bound: "at least 0",
            value,
        })
    }
}

/// Collect the lines of a block note up to `end note`
fn collect_note_lines(
    target: &str,
    rest: &mut slice::Iter<'_, Statement>,
) -> Result<Vec<String>, ErrorKind> {
    let mut lines = Vec::new();
    for statement in rest.by_ref() {
        match &statement.kind {
            StatementKind::NoteLine(line) => lines.push(line.clone()),
            StatementKind::EndNote => return Ok(lines),
            _ => break,
        }
    }
    Err(ErrorKind::UnterminatedNote {
        target: target.to_string(),
    })
}
