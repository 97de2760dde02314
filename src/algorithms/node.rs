use crate::grid::Position;
use std::fmt;

/// A discovered cell together with its priority key for the current run.
///
/// The score is the Manhattan distance to the goal, fixed at discovery.
/// Parent links live in the engine's parent map, not on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Position,
    pub heuristic_score: usize,
}

impl SearchNode {
    pub fn discover(position: Position, goal: &Position) -> Self {
        SearchNode {
            position,
            heuristic_score: position.manhattan_distance(goal),
        }
    }
}

/// Cells from start to goal, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    positions: Vec<Position>,
}

impl Path {
    /// Takes positions in goal-to-start order, as produced by walking parents.
    pub fn from_reversed(mut positions: Vec<Position>) -> Self {
        positions.reverse();
        Path { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of cells on the path, both endpoints counted.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of moves along the path.
    pub fn moves(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&Position> {
        self.positions.first()
    }

    pub fn goal(&self) -> Option<&Position> {
        self.positions.last()
    }
}

impl IntoIterator for Path {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pos) in self.positions.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", pos)?;
        }
        Ok(())
    }
}
