//! Geometry primitives and the vertical cursor

/// Absolute point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Horizontal extent of the rectangle
    pub fn span(&self) -> Span {
        Span::new(self.x, self.right())
    }
}

/// Closed horizontal interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    /// Create a span; the bounds may be given in any order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn point(x: f64) -> Self {
        Self { min: x, max: x }
    }

    pub fn union(&self, other: Span) -> Span {
        Span {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, other: Span) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Grow both edges outwards
    pub fn expand(&self, left: f64, right: f64) -> Span {
        Span {
            min: self.min - left,
            max: self.max + right,
        }
    }
}

/// Widen an optional span with another one
pub(crate) fn widen(target: &mut Option<Span>, span: Span) {
    *target = Some(match target {
        Some(existing) => existing.union(span),
        None => span,
    });
}

/// Vertical writing position
///
/// Rendered statements move the cursor with [`Cursor::advance`]. Standalone
/// `space` statements shift it permanently with [`Cursor::displace`], while
/// inline offsets (a note's `dy`) only peek at a displaced position through
/// [`Cursor::offset`] and leave the cursor where it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    y: f64,
}

impl Cursor {
    pub fn new(start: f64) -> Self {
        Self { y: start }
    }

    pub fn current(&self) -> f64 {
        self.y
    }

    /// Move down by `amount` and return the new position
    pub fn advance(&mut self, amount: f64) -> f64 {
        self.y += amount;
        self.y
    }

    /// Position for the current statement only, the cursor itself is unchanged
    pub fn offset(&self, delta: f64) -> f64 {
        self.y + delta
    }

    /// Permanently shift the cursor
    pub fn displace(&mut self, delta: f64) {
        self.y += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_union_and_contains() {
        let a = Span::new(10.0, 0.0);
        assert_eq!(a.min, 0.0);
        let b = a.union(Span::new(20.0, 30.0));
        assert_eq!(b, Span::new(0.0, 30.0));
        assert!(b.contains(a));
        assert!(!a.contains(b));
        assert_eq!(b.expand(5.0, 1.0), Span::new(-5.0, 31.0));
    }

    #[test]
    fn test_widen_empty() {
        let mut span = None;
        widen(&mut span, Span::point(4.0));
        widen(&mut span, Span::new(-2.0, 1.0));
        assert_eq!(span, Some(Span::new(-2.0, 4.0)));
    }

    #[test]
    fn test_cursor_inline_offset_does_not_move() {
        let mut cursor = Cursor::new(60.0);
        assert_eq!(cursor.offset(15.0), 75.0);
        assert_eq!(cursor.advance(10.0), 70.0);
    }

    #[test]
    fn test_cursor_displace_is_permanent() {
        let mut cursor = Cursor::new(60.0);
        cursor.displace(-20.0);
        assert_eq!(cursor.current(), 40.0);
        assert_eq!(cursor.advance(10.0), 50.0);
    }
}
