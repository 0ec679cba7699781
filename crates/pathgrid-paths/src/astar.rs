//! Point-to-point search with an admissible estimate.

use pathgrid_core::{Map, Point, Range};

use crate::cost::{EdgeCosts, UNREACHABLE, add_dist, from_fixed};
use crate::error::PathError;
use crate::frontier::Frontier;
use crate::neighbors::Neighbors;
use crate::oracle::{CostOracle, FnOracle};
use crate::path::Path;

const NO_PARENT: usize = usize::MAX;

#[derive(Clone)]
struct Node {
    dist: i32,
    parent: usize,
    generation: u32,
    closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            dist: UNREACHABLE,
            parent: NO_PARENT,
            generation: 0,
            closed: false,
        }
    }
}

/// Point-to-point engine.
///
/// [`compute`](Self::compute) finds a cheapest route from an origin to a
/// destination and stores it; [`walk`](Self::walk) then moves along it one
/// step at a time, optionally recomputing when the world changed under the
/// stored route.
pub struct AstarPath<O> {
    oracle: O,
    bounds: Range,
    edges: EdgeCosts,
    frontier: Frontier,
    nodes: Vec<Node>,
    generation: u32,
    destination: Point,
    path: Path,
    nbuf: Neighbors,
}

impl AstarPath<Map> {
    /// Routes over a walkability [`Map`].
    ///
    /// The engine shares the map's terrain buffer, so edits made through
    /// `map` are seen by later computes and walks.
    pub fn from_map(map: &Map, diagonal_cost: f32) -> Result<Self, PathError> {
        Self::new(map.width(), map.height(), map.clone(), diagonal_cost)
    }
}

impl<F> AstarPath<FnOracle<F>>
where
    F: Fn(Point, Point) -> f32,
{
    /// Routes over a `width` x `height` grid priced by `cost`.
    ///
    /// Any positive cost is allowed, so the search runs without a goal
    /// estimate. Pass `FnOracle::new(cost).with_min_cost(..)` to
    /// [`new`](AstarPath::new) to enable one.
    pub fn from_fn(width: i32, height: i32, cost: F, diagonal_cost: f32) -> Result<Self, PathError> {
        Self::new(width, height, FnOracle::new(cost), diagonal_cost)
    }
}

impl<O: CostOracle> AstarPath<O> {
    /// Create an engine for a `width` x `height` grid.
    pub fn new(width: i32, height: i32, oracle: O, diagonal_cost: f32) -> Result<Self, PathError> {
        if width <= 0 || height <= 0 {
            return Err(PathError::InvalidSize { width, height });
        }
        let bounds = Range::with_size(width, height);
        Ok(Self {
            oracle,
            bounds,
            edges: EdgeCosts::new(diagonal_cost),
            frontier: Frontier::new(2)?,
            nodes: vec![Node::default(); bounds.len()],
            generation: 0,
            destination: Point::ZERO,
            path: Path::default(),
            nbuf: Neighbors::new(),
        })
    }

    /// Grid rectangle searched by the engine.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Step multipliers in use.
    #[inline]
    pub fn edge_costs(&self) -> EdgeCosts {
        self.edges
    }

    /// The oracle consulted for every step.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the oracle. The stored path is left as is.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Where the agent currently stands.
    #[inline]
    pub fn origin(&self) -> Point {
        self.path.origin()
    }

    /// Where the route is going.
    #[inline]
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// The stored route.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find a cheapest route from `origin` to `destination`.
    ///
    /// Fails when either endpoint is outside the grid or not walkable, or
    /// when no route exists; the stored path is then empty. When both
    /// endpoints are the same cell the search trivially succeeds with an
    /// empty path.
    pub fn compute(&mut self, origin: Point, destination: Point) -> bool {
        self.path.reset(origin);
        self.destination = destination;
        self.frontier.clear();

        let (Some(start), Some(goal)) = (self.bounds.index_of(origin), self.bounds.index_of(destination))
        else {
            return false;
        };
        if !self.oracle.is_walkable(origin) || !self.oracle.is_walkable(destination) {
            return false;
        }
        if start == goal {
            return true;
        }

        let cur_gen = self.next_generation();
        let min_cost = self.oracle.min_cost();
        self.nodes[start] = Node {
            dist: 0,
            parent: NO_PARENT,
            generation: cur_gen,
            closed: false,
        };
        let h = self.edges.estimate(origin, destination, min_cost);
        if let Err(e) = self.frontier.push(&[origin.x, origin.y], 0, h) {
            log::warn!("astar: could not seed frontier: {e}");
            return false;
        }

        let mut expanded = 0usize;
        let mut stale = 0usize;
        let found = 'search: loop {
            if self.frontier.pop().is_err() {
                break 'search false;
            }
            let dist = self.frontier.active_dist();
            let p = Point::new(self.frontier.active_index()[0], self.frontier.active_index()[1]);
            let Some(ci) = self.bounds.index_of(p) else {
                continue;
            };
            if ci == goal {
                break 'search true;
            }
            let node = &mut self.nodes[ci];
            if node.closed || dist > node.dist {
                stale += 1;
                continue;
            }
            node.closed = true;
            expanded += 1;

            for &(n, step) in self.nbuf.passable(p, self.bounds, &self.oracle, self.edges) {
                let Some(ni) = self.bounds.index_of(n) else {
                    continue;
                };
                let nd = add_dist(dist, step);
                let nn = &mut self.nodes[ni];
                if nn.generation != cur_gen {
                    *nn = Node {
                        generation: cur_gen,
                        ..Node::default()
                    };
                }
                if nd >= nn.dist {
                    continue;
                }
                nn.dist = nd;
                nn.parent = ci;
                nn.closed = false;
                let key = add_dist(nd, self.edges.estimate(n, destination, min_cost));
                if let Err(e) = self.frontier.push(&[n.x, n.y], nd, key) {
                    log::warn!("astar: frontier growth failed at {n}: {e}");
                    break 'search false;
                }
            }
        };

        if !found {
            log::debug!("astar: no route {origin} -> {destination}, {expanded} cells expanded");
            return false;
        }

        let mut ci = goal;
        while ci != start && ci != NO_PARENT {
            self.path.push_step_front(self.bounds.point_at(ci));
            ci = self.nodes[ci].parent;
        }
        log::debug!(
            "astar: {origin} -> {destination} in {} steps, {expanded} cells expanded, {stale} stale pops",
            self.path.size()
        );
        true
    }

    /// Step onto the next cell of the stored route and return it.
    ///
    /// If that step has become impassable, either recompute a route from the
    /// current position to the destination (`recalc_when_needed`) or fail
    /// without moving. Returns `None` when the path is exhausted, the step
    /// is blocked, or recomputing found no route.
    pub fn walk(&mut self, recalc_when_needed: bool) -> Option<Point> {
        let next = self.path.get(0)?;
        let here = self.path.origin();
        if self.step_cost(here, next).is_none() {
            if !recalc_when_needed {
                return None;
            }
            log::trace!("astar: step {here} -> {next} blocked, recomputing");
            if !self.compute(here, self.destination) {
                return None;
            }
        }
        self.path.walk()
    }

    /// Swap origin and destination and reverse the stored route.
    ///
    /// Reversing twice is the identity.
    pub fn reverse(&mut self) {
        let from = self.path.origin();
        if self.path.is_empty() {
            self.path.reset(self.destination);
        } else {
            self.path.reverse();
        }
        self.destination = from;
    }

    /// Cost of the remaining route as currently priced by the oracle, or
    /// `None` if one of its steps is now impassable.
    pub fn cost(&self) -> Option<f32> {
        let mut total = 0;
        for (a, b) in self.path.cells().zip(self.path.iter()) {
            total = add_dist(total, self.step_cost(a, b)?);
        }
        Some(from_fixed(total))
    }

    /// Number of remaining steps.
    #[inline]
    pub fn size(&self) -> usize {
        self.path.size()
    }

    /// Whether no steps remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The `index`-th remaining step.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.path.get(index)
    }

    fn step_cost(&self, from: Point, to: Point) -> Option<i32> {
        if !self.bounds.contains(to) {
            return None;
        }
        self.edges.step(from, to, self.oracle.cost(from, to))
    }

    // Generation counters lazily invalidate the node array between searches.
    fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.nodes.fill(Node::default());
            self.generation = 1;
        }
        self.generation
    }
}
