//! Pathfinding over integer grids.
//!
//! Two engines share one cost model and one route type:
//!
//! - **Dijkstra** distance maps ([`DijkstraMap`]): distances from one or
//!   more roots to every reachable cell, plus greedy descent back to a root.
//! - **A\*** point-to-point search ([`AstarPath`]): a cheapest route between
//!   two cells that can be walked step by step and recomputed on the fly.
//!
//! Both consult a [`CostOracle`] for every step they consider. A
//! [`Map`](pathgrid_core::Map) is an oracle out of the box; arbitrary
//! closures become one through [`FnOracle`].
//!
//! [`DistanceField`] runs the same flood over 1 to 4 dimensional grids of
//! integer cell costs, recording each cell's predecessor.
//!
//! Distances are accumulated in fixed point (see [`COST_SCALE`]) and
//! ordered by a reusable [`Frontier`] built on [`MinHeap`].

mod astar;
mod cost;
mod dijkstra;
mod error;
mod field;
mod frontier;
mod heap;
mod neighbors;
mod oracle;
mod path;

pub use astar::AstarPath;
pub use cost::{COST_SCALE, EdgeCosts, UNREACHABLE, from_fixed, to_fixed};
pub use dijkstra::{DijkstraMap, MapState, NO_DISTANCE};
pub use error::PathError;
pub use field::DistanceField;
pub use frontier::{Frontier, MAX_DIMENSIONS};
pub use heap::{DEFAULT_CAPACITY, MAX_NODE_SIZE, MinHeap};
pub use oracle::{CostOracle, FnOracle};
pub use path::Path;
