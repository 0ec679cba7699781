use pathgrid_core::{Map, Point};

/// Source of edge costs for the search engines.
///
/// Engines never own terrain; they ask the oracle about every step they
/// consider, so terrain changes are picked up on the next query.
pub trait CostOracle {
    /// Cost of stepping from `from` onto adjacent `to`.
    ///
    /// `0.0` (or any non-positive value) means the step is impassable. The
    /// oracle must not apply diagonal scaling itself; engines multiply
    /// diagonal steps by their configured diagonal cost.
    fn cost(&self, from: Point, to: Point) -> f32;

    /// Whether a route may start or end on `p`.
    fn is_walkable(&self, _p: Point) -> bool {
        true
    }

    /// A lower bound on every positive value [`cost`](Self::cost) returns.
    ///
    /// Goal-directed search scales its estimate by this bound. The default
    /// of `0.0` turns the estimate off, which is always safe but explores
    /// more cells.
    fn min_cost(&self) -> f32 {
        0.0
    }
}

/// Walkable cells cost 1.0 to enter, everything else is blocked.
impl CostOracle for Map {
    fn cost(&self, _from: Point, to: Point) -> f32 {
        if self.is_walkable(to) { 1.0 } else { 0.0 }
    }

    fn is_walkable(&self, p: Point) -> bool {
        Map::is_walkable(self, p)
    }

    fn min_cost(&self) -> f32 {
        1.0
    }
}

/// Adapter turning a `Fn(from, to) -> cost` closure into an oracle.
///
/// State captured by the closure plays the role of user data.
#[derive(Clone, Copy)]
pub struct FnOracle<F> {
    f: F,
    min_cost: f32,
}

impl<F> FnOracle<F>
where
    F: Fn(Point, Point) -> f32,
{
    /// Wrap `f`. No lower bound on its costs is assumed.
    pub fn new(f: F) -> Self {
        Self { f, min_cost: 0.0 }
    }

    /// Declare the cheapest positive cost `f` can return, letting A* aim
    /// at the goal. A bound above the real minimum may yield routes that
    /// are not the cheapest.
    pub fn with_min_cost(mut self, min_cost: f32) -> Self {
        self.min_cost = min_cost;
        self
    }
}

impl<F> CostOracle for FnOracle<F>
where
    F: Fn(Point, Point) -> f32,
{
    fn cost(&self, from: Point, to: Point) -> f32 {
        (self.f)(from, to)
    }

    fn min_cost(&self) -> f32 {
        self.min_cost
    }
}
