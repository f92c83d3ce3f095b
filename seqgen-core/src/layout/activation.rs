//! Activation tracking per participant
//!
//! Each participant owns a stack of open activations. Nested activations are
//! shifted sideways so they form a staircase: the first nested bar steps
//! towards the participant that triggered it (right when unknown), deeper bars
//! keep stepping in the same direction.

use crate::error::ErrorKind;
use crate::geometry::Rect;
use crate::scene::ActivationBar;

/// Open activation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    start_y: f64,
    dx: f64,
    /// Statement that opened the activation
    line: usize,
}

#[derive(Debug, Clone)]
struct LaneState {
    id: String,
    center_x: f64,
    stack: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct ActivationTracker {
    lanes: Vec<LaneState>,
    bar_width: f64,
    stack_offset: f64,
}

impl ActivationTracker {
    pub fn new(bar_width: f64, stack_offset: f64) -> Self {
        Self {
            lanes: Vec::new(),
            bar_width,
            stack_offset,
        }
    }

    /// Start tracking a newly declared lane; lanes are added in index order
    pub fn add_lane(&mut self, id: &str, center_x: f64) {
        self.lanes.push(LaneState {
            id: id.to_string(),
            center_x,
            stack: Vec::new(),
        });
    }

    /// Push an activation starting at `y` and return the new stack depth
    ///
    /// `activator` is the lane order of the participant whose message caused
    /// the activation, if any.
    pub fn activate(
        &mut self,
        lane: usize,
        y: f64,
        activator: Option<isize>,
        line: usize,
    ) -> usize {
        let offset = self.stack_offset;
        let state = &mut self.lanes[lane];

        let dx = match state.stack.as_slice() {
            [] => 0.0,
            [only] => {
                let from_left = activator.is_some_and(|order| order < lane as isize);
                if from_left {
                    only.dx - offset
                } else {
                    only.dx + offset
                }
            }
            [.., previous, last] => {
                if last.dx > previous.dx {
                    last.dx + offset
                } else {
                    last.dx - offset
                }
            }
        };

        state.stack.push(Entry {
            start_y: y,
            dx,
            line,
        });
        state.stack.len()
    }

    /// Pop the innermost activation, closing its bar at `y`
    pub fn deactivate(&mut self, lane: usize, y: f64) -> Result<ActivationBar, ErrorKind> {
        let bar_width = self.bar_width;
        let state = &mut self.lanes[lane];
        let entry = state.stack.pop().ok_or_else(|| ErrorKind::OverDeactivation {
            name: state.id.clone(),
        })?;

        Ok(ActivationBar {
            lane,
            depth: state.stack.len(),
            rect: Rect::new(
                state.center_x + entry.dx - bar_width / 2.0,
                entry.start_y,
                bar_width,
                y - entry.start_y,
            ),
        })
    }

    pub fn depth(&self, lane: usize) -> usize {
        self.lanes[lane].stack.len()
    }

    pub fn is_active(&self, lane: usize) -> bool {
        !self.lanes[lane].stack.is_empty()
    }

    pub fn all_inactive(&self) -> bool {
        self.lanes.iter().all(|state| state.stack.is_empty())
    }

    /// Ids of participants with open activations, in lane order
    pub fn still_active(&self) -> Vec<String> {
        self.lanes
            .iter()
            .filter(|state| !state.stack.is_empty())
            .map(|state| state.id.clone())
            .collect()
    }

    /// Line of the most recent activation that is still open
    pub fn last_open_line(&self) -> Option<usize> {
        self.lanes
            .iter()
            .flat_map(|state| state.stack.iter().map(|entry| entry.line))
            .max()
    }

    /// Horizontal offset of the innermost activation, if any
    pub fn top_dx(&self, lane: usize) -> Option<f64> {
        self.lanes[lane].stack.last().map(|entry| entry.dx)
    }

    /// X coordinate where an arrow attaches to the lane on the given side
    ///
    /// Attaches to the innermost activation bar when the lane is active,
    /// otherwise to the lifeline itself.
    pub fn attach_x(&self, lane: usize, right_side: bool) -> f64 {
        let state = &self.lanes[lane];
        match state.stack.last() {
            Some(entry) => {
                let half = self.bar_width / 2.0;
                let center = state.center_x + entry.dx;
                if right_side {
                    center + half
                } else {
                    center - half
                }
            }
            None => state.center_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ActivationTracker {
        let mut tracker = ActivationTracker::new(10.0, 10.0);
        tracker.add_lane("A", 80.0);
        tracker.add_lane("B", 280.0);
        tracker
    }

    #[test]
    fn test_depth_counts_pushes_and_pops() {
        let mut tracker = tracker();
        for i in 0..3 {
            tracker.activate(1, i as f64 * 10.0, None, 1);
        }
        tracker.deactivate(1, 50.0).unwrap();
        assert_eq!(tracker.depth(1), 2);
        assert!(tracker.is_active(1));
        assert!(!tracker.is_active(0));
    }

    #[test]
    fn test_over_deactivation() {
        let mut tracker = tracker();
        tracker.activate(0, 10.0, None, 1);
        tracker.deactivate(0, 20.0).unwrap();
        assert_eq!(
            tracker.deactivate(0, 30.0),
            Err(ErrorKind::OverDeactivation {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn test_bar_geometry() {
        let mut tracker = tracker();
        tracker.activate(0, 60.0, None, 1);
        let bar = tracker.deactivate(0, 100.0).unwrap();
        assert_eq!(bar.rect, Rect::new(75.0, 60.0, 10.0, 40.0));
        assert_eq!(bar.depth, 0);
    }

    #[test]
    fn test_staircase_steps_towards_activator() {
        let mut tracker = tracker();
        tracker.activate(1, 0.0, None, 1);
        // activated from A, which sits to the left
        tracker.activate(1, 10.0, Some(0), 1);
        assert_eq!(tracker.top_dx(1), Some(-10.0));
        tracker.activate(1, 20.0, None, 1);
        assert_eq!(tracker.top_dx(1), Some(-20.0));

        tracker.activate(0, 0.0, None, 1);
        tracker.activate(0, 10.0, Some(1), 1);
        assert_eq!(tracker.top_dx(0), Some(10.0));
        tracker.activate(0, 20.0, Some(1), 1);
        assert_eq!(tracker.top_dx(0), Some(20.0));
    }

    #[test]
    fn test_still_active_and_attach() {
        let mut tracker = tracker();
        assert!(tracker.all_inactive());
        assert_eq!(tracker.attach_x(1, true), 280.0);
        tracker.activate(1, 0.0, None, 1);
        assert_eq!(tracker.attach_x(1, false), 275.0);
        assert_eq!(tracker.attach_x(1, true), 285.0);
        assert_eq!(tracker.still_active(), vec!["B".to_string()]);
        assert!(!tracker.all_inactive());
    }

    #[test]
    fn test_last_open_line() {
        let mut tracker = tracker();
        assert_eq!(tracker.last_open_line(), None);
        tracker.activate(0, 0.0, None, 3);
        tracker.activate(1, 10.0, None, 4);
        tracker.activate(0, 20.0, None, 6);
        tracker.deactivate(0, 30.0).unwrap();
        assert_eq!(tracker.last_open_line(), Some(4));
    }
}
