//! A static walkability map.
//!
//! [`Map`] stores a pair of flags per cell (transparent, walkable). Handles
//! are cheap to clone and share the same backing buffer (`Rc<RefCell<...>>`),
//! so terrain edited through one handle is immediately visible through every
//! other handle, including the ones held by pathfinding engines.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geom::{Point, Range};

/// Per-cell terrain flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellFlags {
    /// Light passes through the cell.
    pub transparent: bool,
    /// Creatures can stand on the cell.
    pub walkable: bool,
}

impl CellFlags {
    /// An open floor cell.
    pub const FLOOR: Self = Self {
        transparent: true,
        walkable: true,
    };
    /// A solid wall cell.
    pub const WALL: Self = Self {
        transparent: false,
        walkable: false,
    };
}

#[derive(Debug)]
struct MapBuffer {
    cells: Vec<CellFlags>,
    bounds: Range,
}

/// A grid of [`CellFlags`] with shared-handle semantics.
#[derive(Debug, Clone)]
pub struct Map {
    buf: Rc<RefCell<MapBuffer>>,
}

impl Map {
    /// Create a `width` x `height` map where every cell is a wall.
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::with_size(width.max(0), height.max(0));
        Self {
            buf: Rc::new(RefCell::new(MapBuffer {
                cells: vec![CellFlags::WALL; bounds.len()],
                bounds,
            })),
        }
    }

    /// Build a map from text rows: `#` is a wall, any other character is
    /// open floor.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        let map = Self::new(width as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MapError::InconsistentWidth {
                    row: y,
                    expected: width,
                    found: row.chars().count(),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let flags = if ch == '#' {
                    CellFlags::WALL
                } else {
                    CellFlags::FLOOR
                };
                map.set(Point::new(x as i32, y as i32), flags);
            }
        }
        Ok(map)
    }

    /// The map rectangle, always anchored at (0, 0).
    pub fn bounds(&self) -> Range {
        self.buf.borrow().bounds
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.bounds().width()
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.bounds().height()
    }

    /// Whether `p` lies inside the map.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Flags at `p`, or `None` outside the map.
    pub fn at(&self, p: Point) -> Option<CellFlags> {
        let buf = self.buf.borrow();
        let idx = buf.bounds.index_of(p)?;
        Some(buf.cells[idx])
    }

    /// Overwrite the flags at `p`. Does nothing outside the map.
    pub fn set(&self, p: Point, flags: CellFlags) {
        let mut buf = self.buf.borrow_mut();
        if let Some(idx) = buf.bounds.index_of(p) {
            buf.cells[idx] = flags;
        }
    }

    /// Set both properties of the cell at `p`.
    pub fn set_properties(&self, p: Point, transparent: bool, walkable: bool) {
        self.set(
            p,
            CellFlags {
                transparent,
                walkable,
            },
        );
    }

    /// Reset every cell to the given properties.
    pub fn clear(&self, transparent: bool, walkable: bool) {
        let flags = CellFlags {
            transparent,
            walkable,
        };
        self.buf.borrow_mut().cells.fill(flags);
    }

    /// Whether `p` is inside the map and walkable.
    pub fn is_walkable(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c.walkable)
    }

    /// Whether `p` is inside the map and transparent.
    pub fn is_transparent(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c.transparent)
    }

    /// Number of walkable cells.
    pub fn count_walkable(&self) -> usize {
        self.buf.borrow().cells.iter().filter(|c| c.walkable).count()
    }

    /// Whether two handles share the same backing buffer.
    pub fn shares_buffer(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }
}

/// Errors from building a [`Map`] out of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A row does not have the same width as the first row.
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentWidth {
                row,
                expected,
                found,
            } => write!(f, "map row {row} has width {found}, expected {expected}"),
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_all_walls() {
        let m = Map::new(4, 3);
        assert_eq!(m.width(), 4);
        assert_eq!(m.height(), 3);
        assert_eq!(m.count_walkable(), 0);
        assert_eq!(m.at(Point::new(1, 1)), Some(CellFlags::WALL));
        assert_eq!(m.at(Point::new(4, 0)), None);
    }

    #[test]
    fn set_properties_and_query() {
        let m = Map::new(3, 3);
        m.set_properties(Point::new(1, 2), true, false);
        assert!(m.is_transparent(Point::new(1, 2)));
        assert!(!m.is_walkable(Point::new(1, 2)));
        m.clear(true, true);
        assert_eq!(m.count_walkable(), 9);
        assert!(!m.is_walkable(Point::new(-1, 0)));
    }

    #[test]
    fn clones_share_terrain() {
        let a = Map::new(2, 2);
        let b = a.clone();
        assert!(a.shares_buffer(&b));
        a.set(Point::new(1, 1), CellFlags::FLOOR);
        assert!(b.is_walkable(Point::new(1, 1)));
    }

    #[test]
    fn from_rows_parses_walls() {
        let m = Map::from_rows(&["..#", "#..", "..."]).unwrap();
        assert_eq!(m.bounds(), Range::with_size(3, 3));
        assert!(!m.is_walkable(Point::new(2, 0)));
        assert!(!m.is_walkable(Point::new(0, 1)));
        assert!(m.is_walkable(Point::new(1, 1)));
        assert_eq!(m.count_walkable(), 7);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Map::from_rows(&["...", ".."]).unwrap_err();
        assert_eq!(
            err,
            MapError::InconsistentWidth {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert!(err.to_string().contains("row 1"));
    }
}
