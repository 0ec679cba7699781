use std::collections::VecDeque;

use pathgrid_core::Point;

/// An ordered route over grid cells.
///
/// A path stores its current origin and the steps that follow it. The
/// origin is not a step: a route touching five cells has [`size`](Self::size)
/// 4, and walking it four times arrives at the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    origin: Point,
    steps: VecDeque<Point>,
}

impl Path {
    /// An empty path sitting at `origin`.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            steps: VecDeque::new(),
        }
    }

    /// A path from `origin` through `steps`.
    pub fn from_steps(origin: Point, steps: impl IntoIterator<Item = Point>) -> Self {
        Self {
            origin,
            steps: steps.into_iter().collect(),
        }
    }

    /// The cell the path currently starts from.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The last cell of the path (the origin when there are no steps).
    #[inline]
    pub fn destination(&self) -> Point {
        self.steps.back().copied().unwrap_or(self.origin)
    }

    /// Number of remaining steps.
    #[inline]
    pub fn size(&self) -> usize {
        self.steps.len()
    }

    /// Alias of [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The `index`-th step, `0` being the cell right after the origin.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.steps.get(index).copied()
    }

    /// Iterate over the remaining steps.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Point> + ExactSizeIterator + '_ {
        self.steps.iter().copied()
    }

    /// Iterate over every cell of the route, origin first.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.origin).chain(self.iter())
    }

    /// Consume the first step and make it the new origin.
    pub fn walk(&mut self) -> Option<Point> {
        let next = self.steps.pop_front()?;
        self.origin = next;
        Some(next)
    }

    /// Reverse the route in place: the destination becomes the origin and
    /// the old origin becomes the last step.
    ///
    /// Reversing twice restores the original path.
    pub fn reverse(&mut self) {
        self.steps.make_contiguous().reverse();
        let Some(dest) = self.steps.pop_front() else {
            return;
        };
        self.steps.push_back(self.origin);
        self.origin = dest;
    }

    pub(crate) fn reset(&mut self, origin: Point) {
        self.origin = origin;
        self.steps.clear();
    }

    pub(crate) fn push_step_front(&mut self, p: Point) {
        self.steps.push_front(p);
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let p = Path::from_steps(Point::new(1, 1), [Point::new(2, 2), Point::new(3, 2)]);
        let json = serde_json::to_string(&p).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
