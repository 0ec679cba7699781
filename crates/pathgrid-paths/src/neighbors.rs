use pathgrid_core::{Point, Range};

use crate::cost::EdgeCosts;
use crate::oracle::CostOracle;

/// Cached neighbor expansion shared by the search engines.
///
/// Yields every in-bounds, passable neighbor of a cell together with the
/// fixed-point cost of the step, scanning clockwise from north
/// (N, NE, E, SE, S, SW, W, NW). Diagonals are skipped without consulting
/// the oracle when the engine disallows them.
#[derive(Debug, Clone)]
pub(crate) struct Neighbors {
    buf: Vec<(Point, i32)>,
}

impl Neighbors {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    pub(crate) fn passable<O: CostOracle>(
        &mut self,
        p: Point,
        bounds: Range,
        oracle: &O,
        edges: EdgeCosts,
    ) -> &[(Point, i32)] {
        self.buf.clear();
        for n in p.neighbors_8() {
            if !bounds.contains(n) {
                continue;
            }
            if p.is_diagonal_to(n) && !edges.allows_diagonals() {
                continue;
            }
            if let Some(cost) = edges.step(p, n, oracle.cost(p, n)) {
                self.buf.push((n, cost));
            }
        }
        &self.buf
    }
}
