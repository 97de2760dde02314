use crate::error::{Error, Result};
use std::fmt;

/// A cell of the grid, identified by `(row, column)` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Position { row, column }
    }

    /// `|Δrow| + |Δcolumn|` between two cells.
    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Bounds of a fixed `size x size` coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    size: usize,
}

impl GridGeometry {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("grid size must be at least 1".into()));
        }
        Ok(GridGeometry { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, row: i64, column: i64) -> bool {
        let size = self.size as i64;
        row >= 0 && row < size && column >= 0 && column < size
    }

    /// Builds a position from signed coordinates, rejecting anything off the grid.
    pub fn position(&self, row: i64, column: i64) -> Result<Position> {
        if self.contains(row, column) {
            Ok(Position::new(row as usize, column as usize))
        } else {
            Err(Error::InvalidPosition {
                row,
                column,
                size: self.size,
            })
        }
    }

    pub fn validate(&self, pos: Position) -> Result<Position> {
        self.position(pos.row as i64, pos.column as i64)
    }

    /// Axis-aligned neighbours that lie on the grid, in the order
    /// down, up, right, left.
    pub fn neighbors(&self, pos: &Position) -> Vec<Position> {
        let (row, column) = (pos.row as i64, pos.column as i64);

        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .filter_map(|(dr, dc)| self.position(row + dr, column + dc).ok())
            .collect()
    }

    /// Start cell used by the visualizer: one in from the top-left corner.
    pub fn default_start(&self) -> Position {
        let inset = 1.min(self.size - 1);
        Position::new(inset, inset)
    }

    /// Goal cell used by the visualizer: one in from the bottom-right corner.
    pub fn default_goal(&self) -> Position {
        let inset = self.size.saturating_sub(2);
        Position::new(inset, inset)
    }

    /// Every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |column| Position::new(row, column)))
    }
}
