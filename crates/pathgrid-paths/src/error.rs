use std::fmt;

/// Errors reported by the heap, the frontier and engine construction.
///
/// Failing to find a route is not an error: engines report it through
/// `bool` / `Option` results and leave their path empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A frontier was created with, or fed an index of, the wrong number of
    /// dimensions.
    InvalidDimensions { ndim: usize, max: usize },
    /// A heap node would exceed the maximum node size.
    NodeTooLarge { size: usize, max: usize },
    /// Growing a working buffer failed.
    OutOfMemory,
    /// `pop` was called on an empty frontier.
    EmptyFrontier,
    /// An engine was created for a grid with no cells.
    InvalidSize { width: i32, height: i32 },
    /// An axis of an N-dimensional field is empty or too long to index.
    InvalidShape { axis: usize, extent: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { ndim, max } => {
                write!(f, "can not make a pathfinder with {ndim} dimensions (1..={max})")
            }
            Self::NodeTooLarge { size, max } => {
                write!(f, "heap node size {size} exceeds the maximum of {max} bytes")
            }
            Self::OutOfMemory => write!(f, "out of memory growing pathfinder storage"),
            Self::EmptyFrontier => write!(f, "frontier is empty"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid grid size {width}x{height}")
            }
            Self::InvalidShape { axis, extent } => {
                write!(f, "axis {axis} has unusable extent {extent}")
            }
        }
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = PathError::InvalidDimensions { ndim: 5, max: 4 };
        assert!(e.to_string().contains("5 dimensions"));
        let e = PathError::NodeTooLarge { size: 300, max: 256 };
        assert!(e.to_string().contains("300"));
        assert_eq!(PathError::EmptyFrontier.to_string(), "frontier is empty");
        let e = PathError::InvalidShape { axis: 2, extent: 0 };
        assert_eq!(e.to_string(), "axis 2 has unusable extent 0");
    }
}
