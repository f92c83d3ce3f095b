//! Participant registry: declaration order, aliases and lane geometry

use std::collections::HashMap;

use crate::ast::{Side, Statement, StatementKind};
use crate::error::ErrorKind;
use crate::geometry::{Rect, Span};

/// A declared participant
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub index: usize,
    /// Display label
    pub name: String,
    pub alias: Option<String>,
    pub x: f64,
    pub width: f64,
}

impl Participant {
    /// Identifier used in statements (alias if present, otherwise name)
    pub fn id(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn span(&self) -> Span {
        Span::new(self.x, self.x + self.width)
    }
}

/// Resolved reference to something a statement can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Declared participant by lane index
    Participant(usize),
    /// Found/lost sentinel at a diagram edge
    Boundary(Side),
}

#[derive(Debug, Clone)]
pub struct Registry {
    participants: Vec<Participant>,
    ids: HashMap<String, usize>,
    width: f64,
    spacing: f64,
    boundary_offset: f64,
    /// Lane count and right edge once every participant is declared
    planned: Option<(usize, f64)>,
}

impl Registry {
    pub fn new(width: f64, spacing: f64, boundary_offset: f64) -> Self {
        Self {
            participants: Vec::new(),
            ids: HashMap::new(),
            width,
            spacing,
            boundary_offset,
            planned: None,
        }
    }

    /// Pin the right found/lost edge past every lane the statements declare
    ///
    /// Lane geometry only depends on declarations and the settings before
    /// them, so the final extent is known before any statement is laid out.
    pub fn plan(&mut self, statements: &[Statement]) {
        let (mut width, mut spacing) = (self.width, self.spacing);
        let mut count = self.participants.len();
        let mut end = self.participants.last().map(|last| last.x + last.width);

        for statement in statements {
            match &statement.kind {
                StatementKind::ParticipantWidth(value) => width = f64::from(*value),
                StatementKind::ParticipantSpacing(value) => spacing = f64::from(*value),
                StatementKind::Participant { .. } => {
                    end = Some(next_x(end, spacing) + width);
                    count += 1;
                }
                _ => {}
            }
        }
        self.planned = Some((count, end.unwrap_or(0.0)));
    }

    /// Width used for participants declared from now on
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Spacing used for participants declared from now on
    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
    }

    /// Declare a participant and assign it the next lane
    pub fn declare(&mut self, name: &str, alias: Option<&str>) -> Result<&Participant, ErrorKind> {
        for key in std::iter::once(name).chain(alias) {
            if self.ids.contains_key(key) {
                return Err(ErrorKind::DuplicateParticipant {
                    name: key.to_string(),
                });
            }
        }

        let index = self.participants.len();
        let end = self.participants.last().map(|last| last.x + last.width);
        let x = next_x(end, self.spacing);

        self.ids.insert(name.to_string(), index);
        if let Some(alias) = alias {
            self.ids.insert(alias.to_string(), index);
        }
        self.participants.push(Participant {
            index,
            name: name.to_string(),
            alias: alias.map(|s| s.to_string()),
            x,
            width: self.width,
        });

        Ok(&self.participants[index])
    }

    /// Resolve a declared name or alias
    pub fn resolve(&self, name: &str) -> Result<Lane, ErrorKind> {
        self.ids
            .get(name)
            .map(|&index| Lane::Participant(index))
            .ok_or_else(|| ErrorKind::UnknownParticipant {
                name: name.to_string(),
            })
    }

    pub fn get(&self, index: usize) -> &Participant {
        &self.participants[index]
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Display name of a lane for messages and errors
    pub fn describe(&self, lane: Lane) -> String {
        match lane {
            Lane::Participant(index) => self.participants[index].id().to_string(),
            Lane::Boundary(side) => format!("{} edge", side.as_str()),
        }
    }

    /// Horizontal position of the lane's lifeline
    pub fn center_x(&self, lane: Lane) -> f64 {
        match lane {
            Lane::Participant(index) => self.participants[index].center_x(),
            Lane::Boundary(Side::Left) => -self.boundary_offset,
            Lane::Boundary(Side::Right) => self.right_end() + self.boundary_offset,
        }
    }

    /// Horizontal extent a frame must cover when the lane is referenced
    pub fn span(&self, lane: Lane) -> Span {
        match lane {
            Lane::Participant(index) => self.participants[index].span(),
            Lane::Boundary(_) => Span::point(self.center_x(lane)),
        }
    }

    /// Lane index used to decide left/right relations; edges sort outside all lanes
    pub fn order(&self, lane: Lane) -> isize {
        match lane {
            Lane::Participant(index) => index as isize,
            Lane::Boundary(Side::Left) => -1,
            Lane::Boundary(Side::Right) => self.lane_count() as isize,
        }
    }

    /// Number of lanes once all planned participants are declared
    fn lane_count(&self) -> usize {
        match self.planned {
            Some((count, _)) => count.max(self.participants.len()),
            None => self.participants.len(),
        }
    }

    /// Right edge of the last lane once all planned participants are declared
    fn right_end(&self) -> f64 {
        match self.planned {
            Some((_, end)) => end.max(self.end_x()),
            None => self.end_x(),
        }
    }

    /// Right edge of the last declared lane
    pub fn end_x(&self) -> f64 {
        self.participants.last().map(|p| p.x + p.width).unwrap_or(0.0)
    }

    /// Full lane rectangle down to `bottom`
    pub fn lane_rect(&self, index: usize, bottom: f64) -> Rect {
        let participant = &self.participants[index];
        Rect::new(participant.x, 0.0, participant.width, bottom)
    }
}

/// Left edge of the lane following one that ends at `end`
fn next_x(end: Option<f64>, spacing: f64) -> f64 {
    match end {
        Some(end) => end + spacing,
        None => 0.0,
    }
}
