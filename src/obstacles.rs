use crate::error::Result;
use crate::grid::{GridGeometry, Position};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Cells the search may never expand through.
///
/// Cloning yields another handle onto the same set: the control side writes
/// through one handle while the search worker reads through another.
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    geometry: GridGeometry,
    cells: Arc<RwLock<FxHashSet<Position>>>,
}

impl ObstacleSet {
    pub fn new(geometry: GridGeometry) -> Self {
        ObstacleSet {
            geometry,
            cells: Arc::new(RwLock::new(FxHashSet::default())),
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Returns `true` if the cell was not already blocked.
    pub fn add(&self, pos: Position) -> Result<bool> {
        let pos = self.geometry.validate(pos)?;
        Ok(self.cells.write().insert(pos))
    }

    /// Returns `true` if the cell was blocked.
    pub fn remove(&self, pos: Position) -> Result<bool> {
        let pos = self.geometry.validate(pos)?;
        Ok(self.cells.write().remove(&pos))
    }

    pub fn clear(&self) {
        self.cells.write().clear();
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.read().contains(pos)
    }

    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.read().is_empty()
    }

    /// Adds every position in one write, stopping at the first invalid one.
    pub fn extend<I>(&self, positions: I) -> Result<()>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut cells = self.cells.write();
        for pos in positions {
            cells.insert(self.geometry.validate(pos)?);
        }
        Ok(())
    }

    /// Point-in-time copy of the blocked cells.
    pub fn snapshot(&self) -> FxHashSet<Position> {
        self.cells.read().clone()
    }
}
