//! Fixed-point edge costs.
//!
//! Oracles report costs as `f32`; the frontier only compares `i32` keys.
//! Every edge cost is therefore encoded as
//! `round(cost * multiplier * COST_SCALE)` before it enters a search, and
//! distances are decoded by dividing by [`COST_SCALE`]. With a scale of
//! 1000 the finest cost step is 0.001 and a route may accumulate up to
//! about two million cost units before distances saturate at
//! [`UNREACHABLE`] - 1.

use pathgrid_core::Point;

/// Fixed-point units per unit of cost.
pub const COST_SCALE: i32 = 1000;

/// Sentinel distance for cells a search has not reached.
pub const UNREACHABLE: i32 = i32::MAX;

/// Encode `cost * multiplier` as fixed-point.
///
/// Returns `None` for impassable edges (`cost <= 0.0` or NaN). A passable
/// edge always encodes to at least 1 so that distances strictly increase
/// along a route.
#[inline]
pub fn to_fixed(cost: f32, multiplier: f32) -> Option<i32> {
    if cost.is_nan() || cost <= 0.0 {
        return None;
    }
    let scaled = (f64::from(cost) * f64::from(multiplier) * f64::from(COST_SCALE)).round();
    let max = f64::from(UNREACHABLE - 1);
    Some(scaled.clamp(1.0, max) as i32)
}

/// Decode a fixed-point distance.
#[inline]
pub fn from_fixed(dist: i32) -> f32 {
    (f64::from(dist) / f64::from(COST_SCALE)) as f32
}

/// Add an edge to an accumulated distance without reaching [`UNREACHABLE`].
#[inline]
pub(crate) fn add_dist(dist: i32, edge: i32) -> i32 {
    dist.saturating_add(edge).min(UNREACHABLE - 1)
}

/// Step multipliers configured for an engine.
///
/// Built from the user-facing `diagonal_cost`: `<= 0.0` disables diagonal
/// moves, `1.0` makes them as cheap as cardinal moves, and `~1.41` gives
/// Euclidean-consistent costs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeCosts {
    diagonal: f32,
}

impl EdgeCosts {
    /// Cardinal moves only.
    pub const CARDINAL: Self = Self { diagonal: 0.0 };

    /// Configuration for the given diagonal multiplier.
    pub fn new(diagonal_cost: f32) -> Self {
        let diagonal = if diagonal_cost > 0.0 { diagonal_cost } else { 0.0 };
        Self { diagonal }
    }

    /// The diagonal multiplier (0.0 when diagonals are disabled).
    #[inline]
    pub fn diagonal_cost(self) -> f32 {
        self.diagonal
    }

    /// Whether diagonal moves are allowed.
    #[inline]
    pub fn allows_diagonals(self) -> bool {
        self.diagonal > 0.0
    }

    /// Multiplier applied to the oracle cost of the step `from -> to`.
    #[inline]
    pub fn multiplier(self, from: Point, to: Point) -> f32 {
        if from.is_diagonal_to(to) {
            self.diagonal
        } else {
            1.0
        }
    }

    /// Fixed-point cost of the step `from -> to` given the raw oracle cost.
    #[inline]
    pub fn step(self, from: Point, to: Point, oracle_cost: f32) -> Option<i32> {
        if from.is_diagonal_to(to) && !self.allows_diagonals() {
            return None;
        }
        to_fixed(oracle_cost, self.multiplier(from, to))
    }

    /// Admissible fixed-point estimate of the cost from `from` to `to`,
    /// assuming no oracle cost is below `min_cost`.
    ///
    /// This is octile distance over the encoded step costs: each diagonal
    /// move is priced at the cheaper of one diagonal step or two cardinal
    /// steps, each remaining straight move at the cheaper of one cardinal or
    /// one diagonal step (two cheap diagonals zig-zag over two straight
    /// cells). The result is a norm, so the estimate is also consistent.
    pub fn estimate(self, from: Point, to: Point, min_cost: f32) -> i32 {
        let Some(cardinal) = to_fixed(min_cost, 1.0) else {
            return 0;
        };
        let cardinal = i64::from(cardinal);
        let dx = i64::from((from.x - to.x).abs());
        let dy = i64::from((from.y - to.y).abs());
        let total = match self.diagonal_step(min_cost) {
            Some(diagonal) => {
                let diagonal = i64::from(diagonal);
                let (long, short) = (dx.max(dy), dx.min(dy));
                short * diagonal.min(2 * cardinal) + (long - short) * cardinal.min(diagonal)
            }
            None => (dx + dy) * cardinal,
        };
        total.min(i64::from(UNREACHABLE - 1)) as i32
    }

    fn diagonal_step(self, cost: f32) -> Option<i32> {
        if !self.allows_diagonals() {
            return None;
        }
        to_fixed(cost, self.diagonal)
    }
}

impl Default for EdgeCosts {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_and_decodes() {
        assert_eq!(to_fixed(1.0, 1.0), Some(1000));
        assert_eq!(to_fixed(1.0, 1.41421), Some(1414));
        assert_eq!(to_fixed(2.5, 1.0), Some(2500));
        assert!((from_fixed(5656) - 5.656).abs() < 1e-6);
    }

    #[test]
    fn non_positive_costs_are_impassable() {
        assert_eq!(to_fixed(0.0, 1.0), None);
        assert_eq!(to_fixed(-3.0, 1.0), None);
        assert_eq!(to_fixed(f32::NAN, 1.0), None);
        // Tiny but positive still moves.
        assert_eq!(to_fixed(0.00001, 1.0), Some(1));
    }

    #[test]
    fn saturating_distances() {
        assert_eq!(add_dist(UNREACHABLE - 10, 100), UNREACHABLE - 1);
        assert_eq!(add_dist(5, 7), 12);
    }

    #[test]
    fn diagonal_configuration() {
        let a = Point::new(0, 0);
        assert!(!EdgeCosts::new(0.0).allows_diagonals());
        assert!(!EdgeCosts::new(-1.0).allows_diagonals());
        assert_eq!(EdgeCosts::CARDINAL.step(a, Point::new(1, 1), 1.0), None);
        assert_eq!(EdgeCosts::CARDINAL.step(a, Point::new(1, 0), 1.0), Some(1000));
        let e = EdgeCosts::new(1.5);
        assert_eq!(e.step(a, Point::new(-1, 1), 2.0), Some(3000));
        assert_eq!(e.step(a, Point::new(0, 1), 2.0), Some(2000));
    }

    #[test]
    fn estimate_is_octile() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 2);
        assert_eq!(EdgeCosts::new(1.0).estimate(a, b, 1.0), 4000);
        assert_eq!(EdgeCosts::new(1.5).estimate(a, b, 1.0), 2 * 1500 + 2 * 1000);
        assert_eq!(EdgeCosts::CARDINAL.estimate(a, b, 1.0), 6000);
        // Expensive diagonals are never worth more than two cardinal steps.
        assert_eq!(EdgeCosts::new(3.0).estimate(a, b, 1.0), 6000);
        // Cheap diagonals zig-zag along the long axis.
        assert_eq!(EdgeCosts::new(0.25).estimate(a, b, 1.0), 4 * 250);
        assert_eq!(EdgeCosts::new(1.0).estimate(a, b, 0.5), 2000);
        // No lower bound on costs: no estimate.
        assert_eq!(EdgeCosts::new(1.0).estimate(a, b, 0.0), 0);
    }
}
