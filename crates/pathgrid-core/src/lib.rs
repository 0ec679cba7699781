//! Grid primitives shared by the pathgrid crates.
//!
//! This crate provides the geometry types ([`Point`], [`Range`]) and a
//! static walkability [`Map`] that pathfinding engines can query as their
//! cost oracle.

pub mod geom;
pub mod map;

pub use geom::{Point, Range, RangeIter};
pub use map::{CellFlags, Map, MapError};
