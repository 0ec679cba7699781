//! Distance fields over N-dimensional integer grids.
//!
//! A [`DistanceField`] is the low-level sibling of
//! [`DijkstraMap`](crate::DijkstraMap): it works on 1 to 4 dimensions,
//! prices steps from a per-cell integer cost array, and leaves seeding to
//! the caller. Cells are linked to their predecessor as they are relaxed,
//! so routes can be read back without a descent.
//!
//! Index `[a0, a1, ..]` is laid out row-major with the last axis varying
//! fastest. A cardinal step changes one axis by 1; a diagonal step changes
//! two axes by 1 each.

use crate::cost::{COST_SCALE, UNREACHABLE, add_dist};
use crate::error::PathError;
use crate::frontier::{Frontier, MAX_DIMENSIONS};

const NO_PARENT: usize = usize::MAX;

type Coord = [i32; MAX_DIMENSIONS];

/// Dijkstra flood over an N-dimensional grid of integer cell costs.
pub struct DistanceField {
    ndim: usize,
    shape: [usize; MAX_DIMENSIONS],
    costs: Vec<i32>,
    cardinal: i32,
    diagonal: i32,
    distances: Vec<i32>,
    traversal: Vec<usize>,
    offsets: Vec<(Coord, bool)>,
    frontier: Frontier,
}

impl DistanceField {
    /// Create a field of the given shape.
    ///
    /// Every cell costs 1 to enter, cardinal steps are weighted
    /// [`COST_SCALE`] and diagonal steps are disabled.
    pub fn new(shape: &[usize]) -> Result<Self, PathError> {
        let frontier = Frontier::new(shape.len())?;
        let ndim = shape.len();
        let mut dims = [1; MAX_DIMENSIONS];
        let mut len = 1usize;
        for (axis, &extent) in shape.iter().enumerate() {
            if extent == 0 || i32::try_from(extent).is_err() {
                return Err(PathError::InvalidShape { axis, extent });
            }
            dims[axis] = extent;
            len = len
                .checked_mul(extent)
                .ok_or(PathError::InvalidShape { axis, extent })?;
        }

        let mut offsets = Vec::new();
        for a in 0..ndim {
            for s in [-1, 1] {
                let mut o = [0; MAX_DIMENSIONS];
                o[a] = s;
                offsets.push((o, false));
            }
        }
        for a in 0..ndim {
            for b in a + 1..ndim {
                for (sa, sb) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                    let mut o = [0; MAX_DIMENSIONS];
                    o[a] = sa;
                    o[b] = sb;
                    offsets.push((o, true));
                }
            }
        }

        Ok(Self {
            ndim,
            shape: dims,
            costs: vec![1; len],
            cardinal: COST_SCALE,
            diagonal: 0,
            distances: vec![UNREACHABLE; len],
            traversal: vec![NO_PARENT; len],
            offsets,
            frontier,
        })
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Extent of every axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.ndim]
    }

    /// Weights applied to cell costs for cardinal and diagonal steps.
    /// A weight `<= 0` disables that kind of step.
    pub fn set_step_costs(&mut self, cardinal: i32, diagonal: i32) {
        self.cardinal = cardinal;
        self.diagonal = diagonal;
    }

    /// Cost of entering the cell at `index`; `<= 0` blocks it.
    pub fn set_cost(&mut self, index: &[i32], cost: i32) -> bool {
        match self.flat(index) {
            Some(i) => {
                self.costs[i] = cost;
                true
            }
            None => false,
        }
    }

    /// Cost of entering the cell at `index`.
    pub fn cost(&self, index: &[i32]) -> Option<i32> {
        self.flat(index).map(|i| self.costs[i])
    }

    /// Distance stored at `index`; [`UNREACHABLE`] for cells not reached.
    pub fn distance(&self, index: &[i32]) -> Option<i32> {
        self.flat(index).map(|i| self.distances[i])
    }

    /// Overwrite the distance at `index` without queuing the cell.
    ///
    /// Follow with [`recompile`](Self::recompile) to propagate edits.
    pub fn set_distance(&mut self, index: &[i32], dist: i32) -> bool {
        match self.flat(index) {
            Some(i) => {
                self.distances[i] = dist;
                self.traversal[i] = NO_PARENT;
                true
            }
            None => false,
        }
    }

    /// Seed a search at `index` with distance `dist`.
    ///
    /// Returns `Ok(false)` for an index outside the field.
    pub fn add_root(&mut self, index: &[i32], dist: i32) -> Result<bool, PathError> {
        self.check_len(index)?;
        let Some(i) = self.flat(index) else {
            return Ok(false);
        };
        if dist < self.distances[i] {
            self.distances[i] = dist;
            self.traversal[i] = NO_PARENT;
            self.frontier.push(index, dist, dist)?;
        }
        Ok(true)
    }

    /// Queue every cell that currently holds a distance.
    ///
    /// Lets a field resume after distances were edited by hand or costs were
    /// lowered since the last compute.
    pub fn recompile(&mut self) -> Result<(), PathError> {
        self.frontier.clear();
        let ndim = self.ndim;
        let seeds: Vec<(Coord, i32)> = self
            .distances
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d != UNREACHABLE)
            .map(|(i, &d)| (self.unflat(i), d))
            .collect();
        log::trace!("field: recompiling from {} seeded cells", seeds.len());
        self.frontier
            .extend(seeds.iter().map(|(c, d)| (&c[..ndim], *d, *d)))
    }

    /// Reset every distance and predecessor and drop queued cells.
    pub fn clear(&mut self) {
        self.distances.fill(UNREACHABLE);
        self.traversal.fill(NO_PARENT);
        self.frontier.clear();
    }

    /// Whether cells are still queued.
    pub fn is_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    /// Expand one queued cell. Returns `Ok(false)` once nothing is queued.
    pub fn compute_step(&mut self) -> Result<bool, PathError> {
        if self.frontier.pop().is_err() {
            return Ok(false);
        }
        let dist = self.frontier.active_dist();
        let mut here: Coord = [0; MAX_DIMENSIONS];
        here[..self.ndim].copy_from_slice(self.frontier.active_index());
        let Some(ci) = self.flat(&here[..self.ndim]) else {
            return Ok(true);
        };
        if dist > self.distances[ci] {
            return Ok(true);
        }

        for &(offset, diagonal) in &self.offsets {
            let weight = if diagonal { self.diagonal } else { self.cardinal };
            if weight <= 0 {
                continue;
            }
            let mut next = here;
            for (n, o) in next.iter_mut().zip(offset) {
                *n += o;
            }
            let Some(ni) = self.flat(&next[..self.ndim]) else {
                continue;
            };
            let cell = self.costs[ni];
            if cell <= 0 {
                continue;
            }
            let nd = add_dist(dist, cell.saturating_mul(weight));
            if nd >= self.distances[ni] {
                continue;
            }
            self.distances[ni] = nd;
            self.traversal[ni] = ci;
            if let Err(e) = self.frontier.push(&next[..self.ndim], nd, nd) {
                log::warn!("field: frontier growth failed: {e}");
                return Err(e);
            }
        }
        Ok(true)
    }

    /// Expand queued cells until none remain.
    pub fn compute(&mut self) -> Result<(), PathError> {
        let mut steps = 0usize;
        while self.compute_step()? {
            steps += 1;
        }
        log::debug!("field: {}-d flood finished after {steps} pops", self.ndim);
        Ok(())
    }

    /// The cell `index` was reached from, or `None` for roots, unreached
    /// cells and indices outside the field. Axes past `ndim` are zero.
    pub fn predecessor(&self, index: &[i32]) -> Option<Coord> {
        let i = self.flat(index)?;
        match self.traversal[i] {
            NO_PARENT => None,
            p => Some(self.unflat(p)),
        }
    }

    /// Route from the root that reached `index` to `index`.
    ///
    /// The root itself is not included, so a root yields an empty route.
    /// Returns `None` if `index` was not reached.
    pub fn path_to(&self, index: &[i32]) -> Option<Vec<Coord>> {
        let mut i = self.flat(index)?;
        if self.distances[i] == UNREACHABLE {
            return None;
        }
        let mut route = Vec::new();
        while self.traversal[i] != NO_PARENT && route.len() < self.distances.len() {
            route.push(self.unflat(i));
            i = self.traversal[i];
        }
        route.reverse();
        Some(route)
    }

    fn check_len(&self, index: &[i32]) -> Result<(), PathError> {
        if index.len() != self.ndim {
            return Err(PathError::InvalidDimensions {
                ndim: index.len(),
                max: self.ndim,
            });
        }
        Ok(())
    }

    fn flat(&self, index: &[i32]) -> Option<usize> {
        if index.len() != self.ndim {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &extent) in index.iter().zip(&self.shape) {
            let i = usize::try_from(i).ok().filter(|&i| i < extent)?;
            flat = flat * extent + i;
        }
        Some(flat)
    }

    fn unflat(&self, mut flat: usize) -> Coord {
        let mut out = [0; MAX_DIMENSIONS];
        for axis in (0..self.ndim).rev() {
            let extent = self.shape[axis];
            out[axis] = (flat % extent) as i32;
            flat /= extent;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            DistanceField::new(&[]),
            Err(PathError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            DistanceField::new(&[2, 2, 2, 2, 2]),
            Err(PathError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            DistanceField::new(&[3, 0]),
            Err(PathError::InvalidShape { axis: 1, extent: 0 })
        ));
    }

    #[test]
    fn line_flood_and_route() {
        let mut f = DistanceField::new(&[5]).unwrap();
        assert!(f.add_root(&[0], 0).unwrap());
        f.compute().unwrap();
        for x in 0..5 {
            assert_eq!(f.distance(&[x]), Some(x * COST_SCALE));
        }
        assert_eq!(f.predecessor(&[3]).map(|c| c[0]), Some(2));
        assert_eq!(f.predecessor(&[0]), None);
        let route: Vec<i32> = f.path_to(&[4]).unwrap().iter().map(|c| c[0]).collect();
        assert_eq!(route, vec![1, 2, 3, 4]);
        assert_eq!(f.path_to(&[0]), Some(Vec::new()));
    }

    #[test]
    fn blocked_cells_split_the_field() {
        let mut f = DistanceField::new(&[6]).unwrap();
        assert!(f.set_cost(&[3], 0));
        f.add_root(&[0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[2]), Some(2 * COST_SCALE));
        assert_eq!(f.distance(&[4]), Some(UNREACHABLE));
        assert_eq!(f.path_to(&[5]), None);
    }

    #[test]
    fn cell_costs_scale_steps() {
        let mut f = DistanceField::new(&[4]).unwrap();
        f.set_step_costs(10, 0);
        f.set_cost(&[2], 5);
        f.add_root(&[0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[3]), Some(10 + 50 + 10));
        assert_eq!(f.cost(&[2]), Some(5));
    }

    #[test]
    fn diagonals_span_two_axes() {
        let mut f = DistanceField::new(&[3, 3, 2]).unwrap();
        f.add_root(&[0, 0, 0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[2, 2, 1]), Some(5 * COST_SCALE));

        f.clear();
        f.set_step_costs(1000, 1414);
        f.add_root(&[0, 0, 0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[2, 2, 1]), Some(2 * 1414 + 1000));
        assert_eq!(f.path_to(&[2, 2, 1]).unwrap().len(), 3);
    }

    #[test]
    fn four_dimensional_corner() {
        let mut f = DistanceField::new(&[2, 2, 2, 2]).unwrap();
        f.add_root(&[0, 0, 0, 0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[1, 1, 1, 1]), Some(4 * COST_SCALE));
        let prev = f.predecessor(&[1, 1, 1, 1]).unwrap();
        assert_eq!(prev.iter().sum::<i32>(), 3);
        assert_eq!(f.shape(), &[2, 2, 2, 2]);
    }

    #[test]
    fn wrong_index_length() {
        let mut f = DistanceField::new(&[4]).unwrap();
        assert!(f.add_root(&[1, 2], 0).is_err());
        assert_eq!(f.add_root(&[7], 0), Ok(false));
        assert_eq!(f.distance(&[1, 2]), None);
        assert!(!f.set_cost(&[-1], 3));
    }

    #[test]
    fn recompile_resumes_from_edited_distances() {
        let mut f = DistanceField::new(&[6]).unwrap();
        f.add_root(&[0], 0).unwrap();
        f.compute().unwrap();
        assert_eq!(f.distance(&[3]), Some(3 * COST_SCALE));

        assert!(f.set_distance(&[5], 0));
        f.recompile().unwrap();
        assert!(f.is_pending());
        f.compute().unwrap();
        assert!(!f.is_pending());
        assert_eq!(f.distance(&[3]), Some(2 * COST_SCALE));
        assert_eq!(f.distance(&[1]), Some(COST_SCALE));
        let route: Vec<i32> = f.path_to(&[3]).unwrap().iter().map(|c| c[0]).collect();
        assert_eq!(route, vec![4, 3]);
    }

    #[test]
    fn stepping_is_incremental() {
        let mut f = DistanceField::new(&[3, 3]).unwrap();
        f.add_root(&[1, 1], 0).unwrap();
        assert_eq!(f.compute_step(), Ok(true));
        assert_eq!(f.distance(&[0, 1]), Some(COST_SCALE));
        assert_eq!(f.distance(&[0, 0]), Some(UNREACHABLE));
        f.compute().unwrap();
        assert_eq!(f.distance(&[0, 0]), Some(2 * COST_SCALE));
        assert_eq!(f.compute_step(), Ok(false));
    }

    #[test]
    fn matches_distance_map_on_random_terrain() {
        use crate::dijkstra::DijkstraMap;
        use pathgrid_core::{Map, Point};
        use rand::rngs::StdRng;
        use rand::{RngExt, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let (w, h) = (rng.random_range(3..12), rng.random_range(3..12));
            let m = Map::new(w, h);
            m.clear(true, true);
            let mut f = DistanceField::new(&[w as usize, h as usize]).unwrap();
            f.set_step_costs(1000, 1414);
            for p in m.bounds() {
                if p != Point::ZERO && rng.random_range(0..100) < 25 {
                    m.set_properties(p, true, false);
                    f.set_cost(&[p.x, p.y], 0);
                }
            }
            let mut dm = DijkstraMap::from_map(&m, 1.414).unwrap();
            dm.compute(Point::ZERO).unwrap();
            f.add_root(&[0, 0], 0).unwrap();
            f.compute().unwrap();
            for p in m.bounds() {
                assert_eq!(f.distance(&[p.x, p.y]), Some(dm.distance_at(p)), "at {p}");
            }
        }
    }
}
