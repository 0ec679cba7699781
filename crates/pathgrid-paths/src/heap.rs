//! A binary min-heap over fixed-size records.
//!
//! Every node is a `(priority, payload)` pair stored inline in one contiguous
//! array. Payloads are small `Copy` records whose size is checked against
//! [`MAX_NODE_SIZE`] when the heap is created. Ordering only ever looks at
//! the `i32` priority; callers encode fractional costs as fixed-point before
//! pushing.
//!
//! There is no decrease-key: callers push a second, cheaper entry and skip
//! the stale one when it surfaces.

use std::mem;

use crate::error::PathError;

/// Capacity of the first allocation.
pub const DEFAULT_CAPACITY: usize = 256;

/// Largest allowed node (priority + payload), in bytes.
pub const MAX_NODE_SIZE: usize = 256;

#[derive(Clone, Copy, Debug)]
struct HeapNode<T> {
    priority: i32,
    data: T,
}

/// Min-heap keyed by an `i32` priority.
#[derive(Clone, Debug)]
pub struct MinHeap<T: Copy> {
    nodes: Vec<HeapNode<T>>,
}

impl<T: Copy> MinHeap<T> {
    /// Create an empty heap.
    ///
    /// Fails with [`PathError::NodeTooLarge`] if a node of `T` would exceed
    /// [`MAX_NODE_SIZE`]. No memory is allocated until the first push.
    pub fn new() -> Result<Self, PathError> {
        let size = Self::node_size();
        if size > MAX_NODE_SIZE {
            return Err(PathError::NodeTooLarge {
                size,
                max: MAX_NODE_SIZE,
            });
        }
        Ok(Self { nodes: Vec::new() })
    }

    /// Size in bytes of one stored node.
    pub const fn node_size() -> usize {
        mem::size_of::<HeapNode<T>>()
    }

    /// Number of stored nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the heap holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes that fit without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drop every node but keep the allocation for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Priority and payload of the minimum node.
    pub fn peek(&self) -> Option<(i32, &T)> {
        self.nodes.first().map(|n| (n.priority, &n.data))
    }

    /// Insert a node and restore the heap order.
    ///
    /// On allocation failure the heap is left unchanged.
    pub fn push(&mut self, priority: i32, data: T) -> Result<(), PathError> {
        self.push_unordered(priority, data)?;
        self.sift_up(self.nodes.len() - 1);
        Ok(())
    }

    /// Append a node without restoring the heap order.
    ///
    /// Call [`heapify`](Self::heapify) before the next `pop`/`peek`.
    pub fn push_unordered(&mut self, priority: i32, data: T) -> Result<(), PathError> {
        self.grow()?;
        self.nodes.push(HeapNode { priority, data });
        Ok(())
    }

    /// Remove the minimum node and return its payload.
    ///
    /// The priority is discarded; read it with [`peek`](Self::peek) first if
    /// it is needed.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.nodes.pop()?;
        if self.nodes.is_empty() {
            return Some(last.data);
        }
        let root = mem::replace(&mut self.nodes[0], last);
        self.sift_down(0);
        Some(root.data)
    }

    /// Restore the heap order of an arbitrarily filled array in O(n).
    pub fn heapify(&mut self) {
        for i in (0..self.nodes.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    /// Whether every parent's priority is <= its children's.
    pub fn is_valid(&self) -> bool {
        (1..self.nodes.len()).all(|i| self.nodes[(i - 1) / 2].priority <= self.nodes[i].priority)
    }

    // Capacity grows by doubling, starting at DEFAULT_CAPACITY.
    fn grow(&mut self) -> Result<(), PathError> {
        if self.nodes.len() < self.nodes.capacity() {
            return Ok(());
        }
        let extra = self.nodes.capacity().max(DEFAULT_CAPACITY);
        self.nodes
            .try_reserve_exact(extra)
            .map_err(|_| PathError::OutOfMemory)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].priority >= self.nodes[parent].priority {
                break;
            }
            self.nodes.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.nodes[left].priority < self.nodes[smallest].priority {
                smallest = left;
            }
            if right < len && self.nodes[right].priority < self.nodes[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    #[test]
    fn rejects_oversized_nodes() {
        let err = MinHeap::<[u8; 300]>::new().unwrap_err();
        assert_eq!(
            err,
            PathError::NodeTooLarge {
                size: MinHeap::<[u8; 300]>::node_size(),
                max: MAX_NODE_SIZE
            }
        );
        assert!(MinHeap::<[i32; 5]>::new().is_ok());
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut h = MinHeap::<u32>::new().unwrap();
        assert_eq!(h.pop(), None);
        assert!(h.peek().is_none());
        assert_eq!(h.capacity(), 0);
    }

    #[test]
    fn sorted_extraction() {
        let mut h = MinHeap::new().unwrap();
        for p in [5, 3, 9, -2, 7, 0, 4] {
            h.push(p, p * 10).unwrap();
        }
        assert_eq!(h.peek(), Some((-2, &-20)));
        let out: Vec<i32> = std::iter::from_fn(|| h.pop()).collect();
        assert_eq!(out, vec![-20, 0, 30, 40, 50, 70, 90]);
    }

    #[test]
    fn capacity_doubles_and_survives_clear() {
        let mut h = MinHeap::new().unwrap();
        h.push(1, ()).unwrap();
        assert_eq!(h.capacity(), DEFAULT_CAPACITY);
        for i in 0..DEFAULT_CAPACITY as i32 {
            h.push(i, ()).unwrap();
        }
        assert_eq!(h.capacity(), DEFAULT_CAPACITY * 2);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), DEFAULT_CAPACITY * 2);
    }

    #[test]
    fn heapify_orders_unordered_fill() {
        let mut h = MinHeap::new().unwrap();
        for p in [8, 1, 6, 3, 2, 9, 0, 5] {
            h.push_unordered(p, p).unwrap();
        }
        h.heapify();
        assert!(h.is_valid());
        let out: Vec<i32> = std::iter::from_fn(|| h.pop()).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 5, 6, 8, 9]);
    }

    #[test]
    fn invariant_holds_under_random_interleaving() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut h = MinHeap::new().unwrap();
        let mut shadow: Vec<i32> = Vec::new();
        for _ in 0..2000 {
            if rng.random_range(0..3) < 2 {
                let p = rng.random_range(-500..500);
                h.push(p, p).unwrap();
                shadow.push(p);
            } else {
                shadow.sort_unstable();
                let expected = if shadow.is_empty() {
                    None
                } else {
                    Some(shadow.remove(0))
                };
                assert_eq!(h.pop(), expected);
            }
            assert!(h.is_valid());
            assert_eq!(h.len(), shadow.len());
        }
    }
}
