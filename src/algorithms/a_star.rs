use crate::algorithms::frontier::Frontier;
use crate::algorithms::node::{Path, SearchNode};
use crate::error::{Error, Result};
use crate::grid::{GridGeometry, Position};
use crate::notification::Notification;
use crate::obstacles::ObstacleSet;
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    NotFound,
}

/// Lifecycle of one run. `Idle` is both the initial and the paused state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Completed(SearchOutcome),
}

/// What a single call to [`AStarSearch::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The search is idle; nothing was popped.
    Paused,
    /// A node was popped and its neighbours were enqueued.
    Explored(SearchNode),
    /// A popped node had become an obstacle after it was enqueued.
    Discarded(Position),
    /// The goal was popped and explored.
    Found { goal: SearchNode, path: Path },
    /// The frontier ran dry.
    NotFound,
    /// The run had already completed; nothing was popped.
    Finished,
}

impl StepOutcome {
    /// Notifications this step produces, in emission order.
    pub fn notifications(&self) -> Vec<Notification> {
        match self {
            StepOutcome::Explored(node) => vec![Notification::Exploring(node.position)],
            StepOutcome::Found { goal, path } => vec![
                Notification::Exploring(goal.position),
                Notification::PathFound(path.clone()),
            ],
            StepOutcome::NotFound => vec![Notification::NoPathFound],
            StepOutcome::Paused | StepOutcome::Discarded(_) | StepOutcome::Finished => Vec::new(),
        }
    }

    /// True when the caller should wait the inter-step delay before stepping again.
    pub fn consumed_tick(&self) -> bool {
        matches!(self, StepOutcome::Explored(_))
    }
}

/// Stepwise best-first search over a 4-connected grid, ordered by Manhattan
/// distance to the goal.
///
/// Progress is only made through [`step`](Self::step), so a run can be paused
/// between any two steps and resumed from the exact same frontier. Obstacles
/// are read at pop time: a node enqueued before its cell was blocked is
/// discarded when it surfaces, never purged eagerly.
#[derive(Debug)]
pub struct AStarSearch {
    geometry: GridGeometry,
    start: Position,
    goal: Position,
    frontier: Frontier,
    visited: FxHashSet<Position>,
    parents: FxHashMap<Position, Position>,
    state: SearchState,
}

impl AStarSearch {
    /// Creates an idle search seeded with `start`.
    pub fn new(geometry: GridGeometry, start: Position, goal: Position) -> Result<Self> {
        let mut search = AStarSearch {
            geometry,
            start: geometry.validate(start)?,
            goal: geometry.validate(goal)?,
            frontier: Frontier::new(),
            visited: FxHashSet::default(),
            parents: FxHashMap::default(),
            state: SearchState::Idle,
        };
        search.seed();
        Ok(search)
    }

    fn seed(&mut self) {
        self.frontier.push(SearchNode::discover(self.start, &self.goal));
        self.visited.insert(self.start);
    }

    /// Discards all progress and re-seeds the frontier with the start cell.
    /// The search is left idle.
    pub fn reset(&mut self) {
        self.frontier.clear();
        self.visited.clear();
        self.parents.clear();
        self.state = SearchState::Idle;
        self.seed();
    }

    /// Resumes stepping. Has no effect once the run has completed.
    pub fn start(&mut self) {
        if self.state == SearchState::Idle {
            self.state = SearchState::Running;
        }
    }

    /// Suspends stepping without touching search progress.
    pub fn stop(&mut self) {
        if self.state == SearchState::Running {
            self.state = SearchState::Idle;
        }
    }

    /// Advances the search by one pop of the frontier.
    pub fn step(&mut self, obstacles: &ObstacleSet) -> Result<StepOutcome> {
        match self.state {
            SearchState::Idle => return Ok(StepOutcome::Paused),
            SearchState::Completed(_) => return Ok(StepOutcome::Finished),
            SearchState::Running => {}
        }

        if self.visited.is_empty() {
            return Err(Error::InvariantViolation(
                "search is running without a seeded frontier".into(),
            ));
        }

        let Some(current) = self.frontier.pop() else {
            self.state = SearchState::Completed(SearchOutcome::NotFound);
            trace!("frontier exhausted after {} discoveries", self.visited.len());
            return Ok(StepOutcome::NotFound);
        };

        if obstacles.contains(&current.position) {
            trace!("discarding blocked cell {}", current.position);
            return Ok(StepOutcome::Discarded(current.position));
        }

        trace!(
            "exploring {} (score {})",
            current.position,
            current.heuristic_score
        );

        for neighbor in self.geometry.neighbors(&current.position) {
            if self.visited.insert(neighbor) {
                self.parents.insert(neighbor, current.position);
                self.frontier.push(SearchNode::discover(neighbor, &self.goal));
            }
        }

        if current.position == self.goal {
            let path = self.reconstruct_path(self.goal)?;
            self.state = SearchState::Completed(SearchOutcome::Found);
            return Ok(StepOutcome::Found {
                goal: current,
                path,
            });
        }

        Ok(StepOutcome::Explored(current))
    }

    /// Starts the search and steps it until it completes, handing every
    /// notification to `notify` in order.
    pub fn run<F>(&mut self, obstacles: &ObstacleSet, mut notify: F) -> Result<SearchOutcome>
    where
        F: FnMut(Notification),
    {
        self.start();
        loop {
            let outcome = self.step(obstacles)?;
            for notification in outcome.notifications() {
                notify(notification);
            }
            if let SearchState::Completed(result) = self.state {
                return Ok(result);
            }
        }
    }

    /// Walks parent links from `end` back to the start cell.
    pub fn reconstruct_path(&self, end: Position) -> Result<Path> {
        let mut reversed = vec![end];
        let mut current = end;

        while current != self.start {
            let Some(&parent) = self.parents.get(&current) else {
                return Err(Error::InvariantViolation(format!(
                    "{} has no parent and is not the start cell",
                    current
                )));
            };
            if reversed.len() > self.visited.len() {
                return Err(Error::InvariantViolation(format!(
                    "parent chain from {} does not reach the start cell",
                    end
                )));
            }
            reversed.push(parent);
            current = parent;
        }

        Ok(Path::from_reversed(reversed))
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SearchState::Completed(_))
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn start_position(&self) -> Position {
        self.start
    }

    pub fn goal_position(&self) -> Position {
        self.goal
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn is_visited(&self, pos: &Position) -> bool {
        self.visited.contains(pos)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn parent_of(&self, pos: &Position) -> Option<Position> {
        self.parents.get(pos).copied()
    }

    #[cfg(test)]
    pub(crate) fn forget_visited(&mut self) {
        self.visited.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(size: usize, start: Position, goal: Position) -> (AStarSearch, ObstacleSet) {
        let geometry = GridGeometry::new(size).unwrap();
        (
            AStarSearch::new(geometry, start, goal).unwrap(),
            ObstacleSet::new(geometry),
        )
    }

    fn collect(
        search: &mut AStarSearch,
        obstacles: &ObstacleSet,
    ) -> (SearchOutcome, Vec<Notification>) {
        let mut notifications = Vec::new();
        let outcome = search.run(obstacles, |n| notifications.push(n)).unwrap();
        (outcome, notifications)
    }

    fn explored(notifications: &[Notification]) -> Vec<Position> {
        notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Exploring(pos) => Some(*pos),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_open_grid_path_has_manhattan_length() {
        let start = Position::new(0, 0);
        let goal = Position::new(4, 4);
        let (mut search, obstacles) = setup(5, start, goal);

        let (outcome, notifications) = collect(&mut search, &obstacles);
        assert_eq!(outcome, SearchOutcome::Found);

        let Some(Notification::PathFound(path)) = notifications.last() else {
            panic!("expected a PathFound notification last");
        };
        assert_eq!(path.len(), start.manhattan_distance(&goal) + 1);
        assert_eq!(path.len(), 9);
        assert_eq!(path.start(), Some(&start));
        assert_eq!(path.goal(), Some(&goal));
        for pair in path.positions().windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_open_grid_larger_default_layout() {
        let geometry = GridGeometry::new(30).unwrap();
        let start = geometry.default_start();
        let goal = geometry.default_goal();
        let mut search = AStarSearch::new(geometry, start, goal).unwrap();
        let obstacles = ObstacleSet::new(geometry);

        let (outcome, notifications) = collect(&mut search, &obstacles);
        assert_eq!(outcome, SearchOutcome::Found);
        let Some(Notification::PathFound(path)) = notifications.last() else {
            panic!("expected a PathFound notification last");
        };
        assert_eq!(path.len(), start.manhattan_distance(&goal) + 1);
    }

    #[test]
    fn test_blocked_column_reports_no_path() {
        let (mut search, obstacles) = setup(5, Position::new(0, 0), Position::new(4, 4));
        obstacles
            .extend((0..5).map(|row| Position::new(row, 2)))
            .unwrap();

        let (outcome, notifications) = collect(&mut search, &obstacles);
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(notifications.last(), Some(&Notification::NoPathFound));
        assert!(!notifications
            .iter()
            .any(|n| matches!(n, Notification::PathFound(_))));
        assert!(explored(&notifications).iter().all(|pos| pos.column < 2));
        assert_eq!(search.state(), SearchState::Completed(SearchOutcome::NotFound));
    }

    #[test]
    fn test_obstacle_added_inside_frontier_is_discarded_lazily() {
        let (mut search, obstacles) = setup(5, Position::new(0, 0), Position::new(4, 4));
        search.start();

        assert!(matches!(search.step(&obstacles).unwrap(), StepOutcome::Explored(_)));
        let blocked = Position::new(1, 0);
        assert!(search.frontier().iter().any(|n| n.position == blocked));

        obstacles.add(blocked).unwrap();
        assert!(search.frontier().iter().any(|n| n.position == blocked));

        let mut discarded = Vec::new();
        let mut notifications = Vec::new();
        while !search.is_complete() {
            let outcome = search.step(&obstacles).unwrap();
            if let StepOutcome::Discarded(pos) = outcome {
                discarded.push(pos);
            }
            notifications.extend(outcome.notifications());
        }

        assert_eq!(discarded, vec![blocked]);
        assert!(!explored(&notifications).contains(&blocked));
        assert!(matches!(notifications.last(), Some(Notification::PathFound(_))));
    }

    #[test]
    fn test_each_pop_takes_the_frontier_minimum() {
        let (mut search, obstacles) = setup(12, Position::new(0, 0), Position::new(11, 7));
        obstacles
            .extend((0..11).map(|column| Position::new(5, column)))
            .unwrap();
        search.start();

        while !search.is_complete() {
            let minimum = search.frontier().iter().map(|n| n.heuristic_score).min();
            if let StepOutcome::Explored(node) | StepOutcome::Found { goal: node, .. } =
                search.step(&obstacles).unwrap()
            {
                assert_eq!(Some(node.heuristic_score), minimum);
            }
        }
        assert_eq!(search.state(), SearchState::Completed(SearchOutcome::Found));
    }

    #[test]
    fn test_pausing_does_not_change_the_run() {
        let start = Position::new(0, 0);
        let goal = Position::new(9, 9);
        let (mut baseline, obstacles) = setup(10, start, goal);
        obstacles
            .extend((1..10).map(|row| Position::new(row, 4)))
            .unwrap();
        let (_, expected) = collect(&mut baseline, &obstacles);

        let (mut paused, _) = setup(10, start, goal);
        let mut notifications = Vec::new();
        let mut ticks = 0;
        while !paused.is_complete() {
            if ticks % 3 == 0 {
                paused.stop();
                assert_eq!(paused.step(&obstacles).unwrap(), StepOutcome::Paused);
                paused.start();
            }
            notifications.extend(paused.step(&obstacles).unwrap().notifications());
            ticks += 1;
        }

        assert_eq!(notifications, expected);
    }

    #[test]
    fn test_add_then_remove_obstacle_leaves_frontier_untouched() {
        let (mut search, obstacles) = setup(6, Position::new(0, 0), Position::new(5, 5));
        search.start();
        for _ in 0..4 {
            search.step(&obstacles).unwrap();
        }
        let mut before: Vec<_> = search.frontier().iter().copied().collect();
        let target = before[0].position;

        obstacles.add(target).unwrap();
        obstacles.remove(target).unwrap();
        assert!(!obstacles.contains(&target));

        let mut after: Vec<_> = search.frontier().iter().copied().collect();
        before.sort_by_key(|n| n.position);
        after.sort_by_key(|n| n.position);
        assert_eq!(before, after);
    }

    #[test]
    fn test_start_equal_to_goal() {
        let here = Position::new(2, 2);
        let (mut search, obstacles) = setup(5, here, here);
        let (outcome, notifications) = collect(&mut search, &obstacles);
        assert_eq!(outcome, SearchOutcome::Found);
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0], Notification::Exploring(here));
        assert!(matches!(&notifications[1], Notification::PathFound(path) if path.len() == 1));
    }

    #[test]
    fn test_out_of_bounds_endpoints_rejected() {
        let geometry = GridGeometry::new(5).unwrap();
        assert!(AStarSearch::new(geometry, Position::new(5, 0), Position::new(4, 4)).is_err());
        assert!(AStarSearch::new(geometry, Position::new(0, 0), Position::new(0, 5)).is_err());
    }

    #[test]
    fn test_completed_run_stays_completed_until_reset() {
        let (mut search, obstacles) = setup(4, Position::new(0, 0), Position::new(3, 3));
        collect(&mut search, &obstacles);
        assert_eq!(search.step(&obstacles).unwrap(), StepOutcome::Finished);

        search.start();
        assert!(search.is_complete());

        search.reset();
        assert_eq!(search.state(), SearchState::Idle);
        assert_eq!(search.visited_count(), 1);
        assert_eq!(search.frontier().len(), 1);
        assert_eq!(search.parent_of(&Position::new(1, 0)), None);

        let (outcome, _) = collect(&mut search, &obstacles);
        assert_eq!(outcome, SearchOutcome::Found);
    }

    #[test]
    fn test_visited_cells_are_never_reenqueued() {
        let (mut search, obstacles) = setup(8, Position::new(0, 0), Position::new(7, 7));
        obstacles
            .extend((0..7).map(|row| Position::new(row, 3)))
            .unwrap();
        let (_, notifications) = collect(&mut search, &obstacles);

        let explored = explored(&notifications);
        let unique: FxHashSet<_> = explored.iter().collect();
        assert_eq!(unique.len(), explored.len());
        for pos in &explored {
            assert!(search.is_visited(pos));
        }
    }

    #[test]
    fn test_path_to_undiscovered_cell_is_an_invariant_violation() {
        let (search, _) = setup(5, Position::new(0, 0), Position::new(4, 4));
        assert!(matches!(
            search.reconstruct_path(Position::new(3, 3)),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_cyclic_parents_are_an_invariant_violation() {
        let (mut search, _) = setup(5, Position::new(0, 0), Position::new(4, 4));
        search.parents.insert(Position::new(1, 0), Position::new(2, 0));
        search.parents.insert(Position::new(2, 0), Position::new(1, 0));
        assert!(matches!(
            search.reconstruct_path(Position::new(1, 0)),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_step_without_seed_fails_and_keeps_state() {
        let (mut search, obstacles) = setup(5, Position::new(0, 0), Position::new(4, 4));
        search.forget_visited();
        search.start();

        assert!(matches!(
            search.step(&obstacles),
            Err(Error::InvariantViolation(_))
        ));
        assert_eq!(search.state(), SearchState::Running);
        assert_eq!(search.frontier().len(), 1);
    }
}
