use crate::algorithms::a_star::{SearchOutcome, StepOutcome};
use crate::grid::{GridGeometry, Position};
use pathfinding::prelude::astar;
use rustc_hash::FxHashSet;
use std::fmt;

/// Counters for one run of the stepwise search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub explored: usize,
    pub discarded: usize,
    pub num_obstacles: usize,
    pub outcome: Option<SearchOutcome>,
    /// Cells on the path the search reported, endpoints included.
    pub path_length: Option<usize>,
    /// Cells on a shortest path given the obstacles at completion.
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: &StepOutcome) {
        match step {
            StepOutcome::Explored(_) => self.explored += 1,
            StepOutcome::Discarded(_) => self.discarded += 1,
            StepOutcome::Found { path, .. } => {
                self.explored += 1;
                self.outcome = Some(SearchOutcome::Found);
                self.path_length = Some(path.len());
            }
            StepOutcome::NotFound => self.outcome = Some(SearchOutcome::NotFound),
            StepOutcome::Paused | StepOutcome::Finished => {}
        }
    }

    /// Compares the reported path against a shortest path over the current walls.
    pub fn finish(
        &mut self,
        geometry: GridGeometry,
        start: Position,
        goal: Position,
        obstacles: &FxHashSet<Position>,
    ) {
        self.num_obstacles = obstacles.len();
        self.optimal_path_length = optimal_path_length(geometry, start, goal, obstacles);
        self.calculate_efficiency();
    }

    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match (self.path_length, self.optimal_path_length) {
            (Some(taken), Some(optimal)) if taken > 0 => optimal as f64 / taken as f64,
            _ => 0.0,
        };
    }
}

/// Shortest path length in cells, or `None` if the goal is walled off.
pub fn optimal_path_length(
    geometry: GridGeometry,
    start: Position,
    goal: Position,
    obstacles: &FxHashSet<Position>,
) -> Option<usize> {
    if obstacles.contains(&start) {
        return None;
    }

    astar(
        &start,
        |p| {
            geometry
                .neighbors(p)
                .into_iter()
                .filter(|neighbor| !obstacles.contains(neighbor))
                .map(|successor| (successor, 1usize))
                .collect::<Vec<_>>()
        },
        |p| p.manhattan_distance(&goal),
        |p| *p == goal,
    )
    .map(|(path, _)| path.len())
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            Some(SearchOutcome::Found) => "path found",
            Some(SearchOutcome::NotFound) => "no path found",
            None => "incomplete",
        };
        writeln!(f, "Outcome: {}", outcome)?;
        writeln!(f, "Tiles Explored: {}", self.explored)?;
        writeln!(f, "Tiles Discarded (walled after discovery): {}", self.discarded)?;
        writeln!(f, "Number of Walls: {}", self.num_obstacles)?;

        if let Some(length) = self.path_length {
            writeln!(f, "Path Length: {}", length)?;
        }
        if self.outcome.is_some() {
            match self.optimal_path_length {
                Some(length) => writeln!(f, "Optimal Path Length: {}", length)?,
                None => writeln!(f, "Optimal Path Length: unreachable")?,
            }
        }

        if self.route_efficiency > 0.0 {
            writeln!(f, "Route Efficiency: {:.1}%", self.route_efficiency * 100.0)?;
        }

        Ok(())
    }
}
