//! Single-source (or multi-source) distance maps.
//!
//! [`DijkstraMap`] floods the whole reachable grid from its roots, storing a
//! fixed-point distance per cell. Once computed, any number of paths back
//! to the roots can be extracted with [`set_path`](DijkstraMap::set_path),
//! which makes it the better choice when many destinations share an origin.

use pathgrid_core::{Map, Point, Range};

use crate::cost::{EdgeCosts, UNREACHABLE, add_dist, from_fixed};
use crate::error::PathError;
use crate::frontier::Frontier;
use crate::neighbors::Neighbors;
use crate::oracle::{CostOracle, FnOracle};
use crate::path::Path;

/// Returned by [`DijkstraMap::get_distance`] for unreached or out-of-range
/// cells, and before the first compute.
pub const NO_DISTANCE: f32 = -1.0;

/// Lifecycle of a [`DijkstraMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// No distance map is available.
    Idle,
    /// The last compute ran to completion.
    Ready,
}

/// Distance-map engine.
pub struct DijkstraMap<O> {
    oracle: O,
    bounds: Range,
    edges: EdgeCosts,
    frontier: Frontier,
    distances: Vec<i32>,
    visited: Vec<bool>,
    roots: Vec<Point>,
    state: MapState,
    path: Path,
    nbuf: Neighbors,
}

impl DijkstraMap<Map> {
    /// Distance maps over a walkability [`Map`].
    ///
    /// The engine keeps a handle to the same terrain buffer, so later edits
    /// to `map` affect the next compute.
    pub fn from_map(map: &Map, diagonal_cost: f32) -> Result<Self, PathError> {
        Self::new(map.width(), map.height(), map.clone(), diagonal_cost)
    }
}

impl<F> DijkstraMap<FnOracle<F>>
where
    F: Fn(Point, Point) -> f32,
{
    /// Distance maps over a `width` x `height` grid priced by `cost`. Any
    /// positive cost is allowed.
    pub fn from_fn(width: i32, height: i32, cost: F, diagonal_cost: f32) -> Result<Self, PathError> {
        Self::new(width, height, FnOracle::new(cost), diagonal_cost)
    }
}

impl<O: CostOracle> DijkstraMap<O> {
    /// Create an engine for a `width` x `height` grid.
    pub fn new(width: i32, height: i32, oracle: O, diagonal_cost: f32) -> Result<Self, PathError> {
        if width <= 0 || height <= 0 {
            return Err(PathError::InvalidSize { width, height });
        }
        let bounds = Range::with_size(width, height);
        let len = bounds.len();
        Ok(Self {
            oracle,
            bounds,
            edges: EdgeCosts::new(diagonal_cost),
            frontier: Frontier::new(2)?,
            distances: vec![UNREACHABLE; len],
            visited: vec![false; len],
            roots: Vec::new(),
            state: MapState::Idle,
            path: Path::default(),
            nbuf: Neighbors::new(),
        })
    }

    /// Grid rectangle covered by the map.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Step multipliers in use.
    #[inline]
    pub fn edge_costs(&self) -> EdgeCosts {
        self.edges
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> MapState {
        self.state
    }

    /// Roots of the last compute.
    pub fn roots(&self) -> &[Point] {
        &self.roots
    }

    /// The oracle consulted for every step.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the oracle. Distances are not recomputed.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Flood the grid from `root`.
    ///
    /// An out-of-range root yields a ready map in which every cell is
    /// unreached.
    pub fn compute(&mut self, root: Point) -> Result<(), PathError> {
        self.compute_multi(&[root])
    }

    /// Flood the grid from every cell in `roots` at once; each root starts
    /// at distance 0.
    pub fn compute_multi(&mut self, roots: &[Point]) -> Result<(), PathError> {
        self.state = MapState::Idle;
        self.distances.fill(UNREACHABLE);
        self.visited.fill(false);
        self.frontier.clear();
        self.roots.clear();

        for &r in roots {
            let Some(i) = self.bounds.index_of(r) else {
                continue;
            };
            if self.distances[i] == 0 {
                continue;
            }
            self.distances[i] = 0;
            self.roots.push(r);
        }
        self.path.reset(self.roots.first().copied().unwrap_or_default());

        let seeds: Vec<[i32; 2]> = self.roots.iter().map(|r| [r.x, r.y]).collect();
        self.frontier.extend(seeds.iter().map(|s| (&s[..], 0, 0)))?;

        let mut expanded = 0usize;
        let mut stale = 0usize;
        while self.frontier.pop().is_ok() {
            let dist = self.frontier.active_dist();
            let (x, y) = (self.frontier.active_index()[0], self.frontier.active_index()[1]);
            let p = Point::new(x, y);
            let Some(ci) = self.bounds.index_of(p) else {
                continue;
            };
            // No decrease-key: a cheaper entry for this cell was pushed later.
            if self.visited[ci] || dist > self.distances[ci] {
                stale += 1;
                continue;
            }
            self.visited[ci] = true;
            expanded += 1;

            for &(n, step) in self.nbuf.passable(p, self.bounds, &self.oracle, self.edges) {
                let Some(ni) = self.bounds.index_of(n) else {
                    continue;
                };
                let nd = add_dist(dist, step);
                if nd >= self.distances[ni] {
                    continue;
                }
                self.distances[ni] = nd;
                if let Err(e) = self.frontier.push(&[n.x, n.y], nd, nd) {
                    log::warn!("dijkstra: frontier growth failed at {n}: {e}");
                    return Err(e);
                }
            }
        }

        self.state = MapState::Ready;
        log::debug!(
            "dijkstra: {} roots, {expanded} cells expanded, {stale} stale pops",
            self.roots.len()
        );
        Ok(())
    }

    /// Raw fixed-point distance at `p`, or [`UNREACHABLE`].
    pub fn distance_at(&self, p: Point) -> i32 {
        if self.state != MapState::Ready {
            return UNREACHABLE;
        }
        match self.bounds.index_of(p) {
            Some(i) => self.distances[i],
            None => UNREACHABLE,
        }
    }

    /// Distance from the nearest root to `p`, or [`NO_DISTANCE`].
    pub fn get_distance(&self, p: Point) -> f32 {
        match self.distance_at(p) {
            UNREACHABLE => NO_DISTANCE,
            d => from_fixed(d),
        }
    }

    /// Extract the route from the roots to `p` into the stored path.
    ///
    /// Starting at `p`, the walk repeatedly moves to the neighbor with the
    /// strictly smallest distance (first match in N, NE, E, SE, S, SW, W, NW
    /// order) until no neighbor is closer. Returns `false`, leaving the path
    /// empty, if `p` was not reached.
    pub fn set_path(&mut self, p: Point) -> bool {
        let start = self.distance_at(p);
        if start == UNREACHABLE {
            self.path.reset(p);
            return false;
        }

        let mut chain = vec![p];
        let mut cur = p;
        let mut best = start;
        loop {
            let mut next = None;
            for n in cur.neighbors_8() {
                if cur.is_diagonal_to(n) && !self.edges.allows_diagonals() {
                    continue;
                }
                let d = self.distance_at(n);
                if d < best {
                    best = d;
                    next = Some(n);
                }
            }
            let Some(n) = next else { break };
            chain.push(n);
            cur = n;
        }

        // `chain` runs destination -> root; the path runs root -> destination.
        let root = chain.pop().unwrap_or(p);
        self.path.reset(root);
        for c in chain {
            self.path.push_step_front(c);
        }
        true
    }

    /// The extracted path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the next step of the extracted path.
    pub fn walk(&mut self) -> Option<Point> {
        self.path.walk()
    }

    /// Reverse the extracted path in place.
    pub fn reverse(&mut self) {
        self.path.reverse();
    }

    /// Number of remaining steps in the extracted path.
    #[inline]
    pub fn size(&self) -> usize {
        self.path.size()
    }

    /// Whether the extracted path has no steps left.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The `index`-th step of the extracted path.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.path.get(index)
    }
}
