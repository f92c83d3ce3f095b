//! Stack of open opt/alt/loop/group frames

use crate::ast::FrameKind;
use crate::error::ErrorKind;
use crate::geometry::{widen, Rect, Span};
use crate::scene::{BranchDivider, FrameBox};

#[derive(Debug, Clone)]
struct Branch {
    label: String,
    y: f64,
}

#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    label: String,
    /// Line of the opening statement
    line: usize,
    y_start: f64,
    /// Union over all branches; dividers run across the whole frame
    span: Option<Span>,
    branches: Vec<Branch>,
    extend_left: f64,
    extend_right: f64,
}

impl Frame {
    fn describe(&self) -> String {
        if self.label.is_empty() {
            self.kind.as_str().to_string()
        } else {
            format!("{} `{}`", self.kind.as_str(), self.label)
        }
    }
}

/// A frame that was just closed, ready for the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedFrame {
    pub frame: FrameBox,
    pub dividers: Vec<BranchDivider>,
}

#[derive(Debug, Clone)]
pub struct FrameStack {
    frames: Vec<Frame>,
    padding: f64,
    tab_width: f64,
    tab_height: f64,
}

impl FrameStack {
    pub fn new(padding: f64, tab_width: f64, tab_height: f64) -> Self {
        Self {
            frames: Vec::new(),
            padding,
            tab_width,
            tab_height,
        }
    }

    pub fn open(&mut self, kind: FrameKind, label: &str, y: f64, line: usize) {
        self.frames.push(Frame {
            kind,
            label: label.to_string(),
            line,
            y_start: y,
            span: None,
            branches: Vec::new(),
            extend_left: 0.0,
            extend_right: 0.0,
        });
    }

    /// Start a new alt branch with a divider at `y`
    pub fn add_branch(&mut self, label: &str, y: f64) -> Result<(), ErrorKind> {
        let frame = self.frames.last_mut().ok_or(ErrorKind::NoOpenFrame)?;
        if frame.kind != FrameKind::Alt {
            return Err(ErrorKind::InvalidBranch {
                kind: frame.kind.as_str().to_string(),
            });
        }

        frame.branches.push(Branch {
            label: label.to_string(),
            y,
        });
        Ok(())
    }

    /// Widen every open frame to cover `span`
    pub fn reference(&mut self, span: Span) {
        for frame in &mut self.frames {
            widen(&mut frame.span, span);
        }
    }

    /// Widen the innermost frame: positive deltas grow the right edge,
    /// negative ones the left edge
    pub fn extend(&mut self, delta: f64) -> Result<(), ErrorKind> {
        let frame = self.frames.last_mut().ok_or(ErrorKind::NoOpenFrame)?;
        if delta >= 0.0 {
            frame.extend_right += delta;
        } else {
            frame.extend_left -= delta;
        }
        Ok(())
    }

    /// Close the innermost frame at `y`
    ///
    /// The closed frame's box is referenced into the remaining open frames so
    /// that parents always enclose their children.
    pub fn close_innermost(&mut self, y: f64) -> Result<ClosedFrame, ErrorKind> {
        let frame = self.frames.pop().ok_or(ErrorKind::NoOpenFrame)?;
        let span = frame.span.ok_or_else(|| ErrorKind::EmptyFrame {
            kind: frame.kind.as_str().to_string(),
            label: frame.label.clone(),
        })?;

        let outer = span.expand(
            self.padding + frame.extend_left,
            self.padding + frame.extend_right,
        );
        let rect = Rect::new(outer.min, frame.y_start, outer.width(), y - frame.y_start);
        self.reference(outer);

        let dividers = frame
            .branches
            .into_iter()
            .map(|branch| BranchDivider {
                label: branch.label,
                x: rect.x,
                y: branch.y,
                width: rect.width,
            })
            .collect();

        Ok(ClosedFrame {
            frame: FrameBox {
                kind: frame.kind,
                label: frame.label,
                rect,
                tab_width: self.tab_width,
                tab_height: self.tab_height,
                depth: self.frames.len(),
            },
            dividers,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Line of the innermost open frame's opening statement
    pub fn innermost_line(&self) -> Option<usize> {
        self.frames.last().map(|frame| frame.line)
    }

    /// Descriptions of the open frames, outermost first
    pub fn open_frames(&self) -> Vec<String> {
        self.frames.iter().map(Frame::describe).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> FrameStack {
        FrameStack::new(10.0, 60.0, 20.0)
    }

    #[test]
    fn test_close_without_open_frame() {
        let mut stack = stack();
        assert_eq!(stack.close_innermost(0.0), Err(ErrorKind::NoOpenFrame));
        assert_eq!(stack.extend(10.0), Err(ErrorKind::NoOpenFrame));
        assert_eq!(stack.add_branch("x", 0.0), Err(ErrorKind::NoOpenFrame));
    }

    #[test]
    fn test_empty_frame() {
        let mut stack = stack();
        stack.open(FrameKind::Opt, "cond", 10.0, 1);
        assert_eq!(
            stack.close_innermost(50.0),
            Err(ErrorKind::EmptyFrame {
                kind: "opt".to_string(),
                label: "cond".to_string()
            })
        );
    }

    #[test]
    fn test_branch_only_in_alt() {
        let mut stack = stack();
        stack.open(FrameKind::Loop, "forever", 0.0, 1);
        assert_eq!(
            stack.add_branch("other", 10.0),
            Err(ErrorKind::InvalidBranch {
                kind: "loop".to_string()
            })
        );
    }

    #[test]
    fn test_reference_widens_all_open_frames() {
        let mut stack = stack();
        stack.open(FrameKind::Group, "outer", 0.0, 1);
        stack.open(FrameKind::Opt, "inner", 10.0, 1);
        stack.reference(Span::new(200.0, 360.0));

        let inner = stack.close_innermost(50.0).unwrap();
        assert_eq!(inner.frame.rect, Rect::new(190.0, 10.0, 180.0, 40.0));
        assert_eq!(inner.frame.depth, 1);

        let outer = stack.close_innermost(60.0).unwrap();
        assert_eq!(outer.frame.rect, Rect::new(180.0, 0.0, 200.0, 60.0));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_extension_is_standing_and_only_enlarges() {
        let mut stack = stack();
        stack.open(FrameKind::Opt, "", 0.0, 1);
        stack.reference(Span::new(0.0, 160.0));
        stack.extend(30.0).unwrap();
        stack.extend(-20.0).unwrap();
        stack.reference(Span::new(200.0, 360.0));

        let closed = stack.close_innermost(40.0).unwrap();
        let span = closed.frame.rect.span();
        assert_eq!(span, Span::new(-30.0, 400.0));
        assert!(span.contains(Span::new(0.0, 360.0)));
    }

    #[test]
    fn test_alt_spans_union_of_branches() {
        let mut stack = stack();
        stack.open(FrameKind::Alt, "a", 0.0, 1);
        stack.reference(Span::new(0.0, 160.0));
        stack.add_branch("b", 30.0).unwrap();
        stack.reference(Span::new(200.0, 360.0));

        let closed = stack.close_innermost(60.0).unwrap();
        assert_eq!(closed.frame.rect.span(), Span::new(-10.0, 370.0));
        assert_eq!(closed.dividers.len(), 1);
        assert_eq!(closed.dividers[0].y, 30.0);
        assert_eq!(closed.dividers[0].width, 380.0);
    }

    #[test]
    fn test_open_frames_description() {
        let mut stack = stack();
        stack.open(FrameKind::Alt, "ok", 0.0, 3);
        stack.open(FrameKind::Group, "", 0.0, 5);
        assert_eq!(stack.open_frames(), vec!["alt `ok`".to_string(), "group".to_string()]);
        assert_eq!(stack.innermost_line(), Some(5));
        stack.reference(Span::new(0.0, 10.0));
        stack.close_innermost(20.0).unwrap();
        assert_eq!(stack.innermost_line(), Some(3));
    }
}
