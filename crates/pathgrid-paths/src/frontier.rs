//! N-dimensional search frontier.
//!
//! A [`Frontier`] is the open set of a best-first search. Each entry carries
//! the accumulated distance of a node and its coordinate, keyed in the heap
//! by a separate heuristic value:
//!
//! - Dijkstra pushes `heuristic == dist`,
//! - A* pushes `heuristic == dist + estimate_to_goal`.
//!
//! Popping does not return the node. Instead the popped values are exposed
//! through [`active_dist`](Frontier::active_dist) and
//! [`active_index`](Frontier::active_index) until the next pop.

use crate::error::PathError;
use crate::heap::MinHeap;

/// Maximum number of coordinate dimensions.
pub const MAX_DIMENSIONS: usize = 4;

#[derive(Clone, Copy, Debug, Default)]
struct FrontierRecord {
    dist: i32,
    index: [i32; MAX_DIMENSIONS],
}

/// Priority frontier over `ndim`-dimensional integer coordinates.
#[derive(Clone, Debug)]
pub struct Frontier {
    ndim: usize,
    active_dist: i32,
    active_index: [i32; MAX_DIMENSIONS],
    heap: MinHeap<FrontierRecord>,
}

impl Frontier {
    /// Create a frontier for `ndim` dimensions (`1..=MAX_DIMENSIONS`).
    pub fn new(ndim: usize) -> Result<Self, PathError> {
        if ndim == 0 || ndim > MAX_DIMENSIONS {
            return Err(PathError::InvalidDimensions {
                ndim,
                max: MAX_DIMENSIONS,
            });
        }
        Ok(Self {
            ndim,
            active_dist: 0,
            active_index: [0; MAX_DIMENSIONS],
            heap: MinHeap::new()?,
        })
    }

    /// Number of coordinate dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Add a node at `index` with accumulated distance `dist`, ordered by
    /// `heuristic`.
    pub fn push(&mut self, index: &[i32], dist: i32, heuristic: i32) -> Result<(), PathError> {
        if index.len() != self.ndim {
            return Err(PathError::InvalidDimensions {
                ndim: index.len(),
                max: self.ndim,
            });
        }
        let mut record = FrontierRecord {
            dist,
            ..FrontierRecord::default()
        };
        record.index[..self.ndim].copy_from_slice(index);
        self.heap.push(heuristic, record)
    }

    /// Pop the node with the smallest heuristic into the active slot.
    pub fn pop(&mut self) -> Result<(), PathError> {
        let record = self.heap.pop().ok_or(PathError::EmptyFrontier)?;
        self.active_dist = record.dist;
        self.active_index = record.index;
        Ok(())
    }

    /// Heuristic key of the next node to be popped.
    pub fn peek_heuristic(&self) -> Option<i32> {
        self.heap.peek().map(|(priority, _)| priority)
    }

    /// Accumulated distance of the last popped node.
    #[inline]
    pub fn active_dist(&self) -> i32 {
        self.active_dist
    }

    /// Coordinate of the last popped node.
    #[inline]
    pub fn active_index(&self) -> &[i32] {
        &self.active_index[..self.ndim]
    }

    /// Number of pending entries, stale ones included.
    #[inline]
    pub fn size(&self) -> usize {
        self.heap.len()
    }

    /// Whether no entries are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Remove every pending entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Append many nodes at once and order them in a single pass.
    ///
    /// Each item is `(index, dist, heuristic)`. Used to seed multi-source
    /// searches.
    pub fn extend<'a, I>(&mut self, nodes: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = (&'a [i32], i32, i32)>,
    {
        let mut result = Ok(());
        for (index, dist, heuristic) in nodes {
            if index.len() != self.ndim {
                result = Err(PathError::InvalidDimensions {
                    ndim: index.len(),
                    max: self.ndim,
                });
                break;
            }
            let mut record = FrontierRecord {
                dist,
                ..FrontierRecord::default()
            };
            record.index[..self.ndim].copy_from_slice(index);
            if let Err(e) = self.heap.push_unordered(heuristic, record) {
                result = Err(e);
                break;
            }
        }
        // Keep the heap valid even when seeding stopped early.
        self.heap.heapify();
        result
    }
}
