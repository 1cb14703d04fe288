//! Board coordinates.

use std::fmt;

/// A position on the board as `(row, col)`.
///
/// Coordinates are plain values: they may point outside any board, and the
/// board is responsible for validating them before use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbors: up, down, left, right.
    ///
    /// No bounds filtering is done here.
    pub fn orthogonal(self) -> [Coord; 4] {
        [
            Coord::new(self.row - 1, self.col),
            Coord::new(self.row + 1, self.col),
            Coord::new(self.row, self.col - 1),
            Coord::new(self.row, self.col + 1),
        ]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_neighbors() {
        let n = Coord::new(3, 5).orthogonal();
        assert_eq!(
            n,
            [
                Coord::new(2, 5),
                Coord::new(4, 5),
                Coord::new(3, 4),
                Coord::new(3, 6)
            ]
        );
    }

    #[test]
    fn test_orthogonal_not_bounds_checked() {
        let n = Coord::new(0, 0).orthogonal();
        assert!(n.contains(&Coord::new(-1, 0)));
        assert!(n.contains(&Coord::new(0, -1)));
    }

    #[test]
    fn test_equality_by_fields() {
        assert_eq!(Coord::new(1, 2), Coord { row: 1, col: 2 });
        assert_ne!(Coord::new(1, 2), Coord::new(2, 1));
    }
}
