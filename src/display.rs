use crate::grid::{GridGeometry, Position};
use crate::notification::Notification;
use crate::obstacles::ObstacleSet;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Explored,
    Path,
    Start,
    Goal,
}

impl Tile {
    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::Explored => 'o',
            Tile::Path => '*',
            Tile::Start => 'S',
            Tile::Goal => 'G',
        }
    }
}

/// Terminal tile map fed by search notifications. Walls are read live from
/// the obstacle set when drawing.
#[derive(Debug)]
pub struct Canvas {
    geometry: GridGeometry,
    start: Position,
    goal: Position,
    explored: FxHashSet<Position>,
    path: FxHashSet<Position>,
    outcome: Option<String>,
}

impl Canvas {
    pub fn new(geometry: GridGeometry, start: Position, goal: Position) -> Self {
        Canvas {
            geometry,
            start,
            goal,
            explored: FxHashSet::default(),
            path: FxHashSet::default(),
            outcome: None,
        }
    }

    /// Records a notification; returns `true` once the run has ended.
    pub fn apply(&mut self, notification: &Notification) -> bool {
        match notification {
            Notification::Exploring(pos) => {
                self.explored.insert(*pos);
            }
            Notification::PathFound(path) => {
                self.path.extend(path.positions().iter().copied());
                self.outcome = Some(format!("Path found: {} tiles", path.len()));
            }
            Notification::NoPathFound => {
                self.outcome = Some("No path found".into());
            }
        }
        notification.is_terminal()
    }

    /// Forgets exploration and path, as after a reset.
    pub fn clear_progress(&mut self) {
        self.explored.clear();
        self.path.clear();
        self.outcome = None;
    }

    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub fn tile_at(&self, pos: &Position, obstacles: &FxHashSet<Position>) -> Tile {
        if *pos == self.start {
            Tile::Start
        } else if *pos == self.goal {
            Tile::Goal
        } else if self.path.contains(pos) {
            Tile::Path
        } else if obstacles.contains(pos) {
            Tile::Wall
        } else if self.explored.contains(pos) {
            Tile::Explored
        } else {
            Tile::Empty
        }
    }

    pub fn render(&self, obstacles: &ObstacleSet) -> String {
        let walls = obstacles.snapshot();
        let size = self.geometry.size();
        let mut out = String::with_capacity((size * 2 + 4) * (size + 2));

        out.push_str("Legend: S=Start, G=Goal, #=Wall, o=Explored, *=Path, .=Empty\n");

        // Column numbers header
        out.push_str("   ");
        for column in 0..size {
            out.push_str(&format!("{:2}", column % 10));
        }
        out.push('\n');

        for row in 0..size {
            out.push_str(&format!("{:2} ", row % 100));
            for column in 0..size {
                out.push(self.tile_at(&Position::new(row, column), &walls).symbol());
                out.push(' ');
            }
            out.push('\n');
        }

        if let Some(outcome) = &self.outcome {
            out.push_str(outcome);
            out.push('\n');
        }
        out
    }
}
