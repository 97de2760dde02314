//! Background search thread and the handle used to steer it.
//!
//! The worker owns the [`AStarSearch`] for the whole process. It blocks on a
//! condition variable while paused or finished and wakes as soon as a
//! command changes the control state. Between explored tiles it waits out the
//! configured delay on the same condition variable, so shutdown and reset
//! cut the wait short and speed changes apply to the wait in progress.

use crate::algorithms::a_star::AStarSearch;
use crate::error::{Error, Result};
use crate::grid::Position;
use crate::maze;
use crate::notification::{Command, NotificationSender};
use crate::obstacles::ObstacleSet;
use crate::statistics::RunStatistics;
use log::{debug, error, info, warn};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const MIN_DELAY_MS: u64 = 1;
pub const MAX_DELAY_MS: u64 = 100;
pub const DEFAULT_DELAY_MS: u64 = 50;

/// Accepts delays in `MIN_DELAY_MS..=MAX_DELAY_MS`.
pub fn validate_delay(delay_ms: u64) -> Result<Duration> {
    if (MIN_DELAY_MS..=MAX_DELAY_MS).contains(&delay_ms) {
        Ok(Duration::from_millis(delay_ms))
    } else {
        Err(Error::InvalidSpeed(delay_ms))
    }
}

#[derive(Debug)]
struct ControlState {
    running: bool,
    delay: Duration,
    reset_requested: bool,
    shutdown: bool,
}

#[derive(Debug)]
struct Control {
    state: Mutex<ControlState>,
    wake: Condvar,
}

impl Control {
    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut ControlState),
    {
        let mut state = self.state.lock();
        change(&mut state);
        self.wake.notify_all();
    }
}

/// Cloneable handle for issuing commands to a running [`SearchWorker`].
///
/// No command blocks on the search: start, stop, speed and reset only flip
/// guarded control values, obstacle edits go straight to the shared set.
#[derive(Debug, Clone)]
pub struct Controller {
    control: Arc<Control>,
    obstacles: ObstacleSet,
    start: Position,
    goal: Position,
}

impl Controller {
    pub fn apply(&self, command: Command) -> Result<()> {
        match command {
            Command::Start => {
                debug!("start requested");
                self.control.update(|state| state.running = true);
            }
            Command::Stop => {
                debug!("stop requested");
                self.control.update(|state| state.running = false);
            }
            Command::SetSpeed(delay_ms) => {
                let delay = validate_delay(delay_ms)?;
                debug!("step delay set to {:?}", delay);
                self.control.update(|state| state.delay = delay);
            }
            Command::AddObstacle(pos) => {
                self.obstacles.add(pos)?;
            }
            Command::RemoveObstacle(pos) => {
                self.obstacles.remove(pos)?;
            }
            Command::ClearObstacles => {
                debug!("clearing {} walls", self.obstacles.len());
                self.obstacles.clear();
            }
            Command::Reset => {
                debug!("reset requested");
                self.control.update(|state| {
                    state.running = false;
                    state.reset_requested = true;
                });
            }
            Command::GenerateMaze { chance } => {
                let walls = maze::generate(
                    self.obstacles.geometry(),
                    self.start,
                    self.goal,
                    chance,
                    &mut rand::thread_rng(),
                );
                debug!("generated {} walls (1 in {})", walls.len(), chance);
                self.obstacles.extend(walls)?;
            }
            Command::Shutdown => {
                debug!("shutdown requested");
                self.control.update(|state| state.shutdown = true);
            }
        }
        Ok(())
    }

    /// Applies a command, logging and dropping it if it is rejected.
    pub fn submit(&self, command: Command) {
        if let Err(e) = self.apply(command) {
            warn!("ignoring {:?}: {}", command, e);
        }
    }

    /// True from a `Reset` command until the worker has picked it up.
    pub fn reset_pending(&self) -> bool {
        self.control.state.lock().reset_requested
    }

    pub fn is_running(&self) -> bool {
        self.control.state.lock().running
    }

    pub fn delay(&self) -> Duration {
        self.control.state.lock().delay
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }
}

/// The dedicated thread that steps the search.
pub struct SearchWorker {
    controller: Controller,
    handle: JoinHandle<Result<RunStatistics>>,
}

impl SearchWorker {
    /// Spawns the worker paused; send [`Command::Start`] to begin.
    pub fn spawn(
        search: AStarSearch,
        obstacles: ObstacleSet,
        delay: Duration,
        notifications: NotificationSender,
    ) -> Result<Self> {
        let control = Arc::new(Control {
            state: Mutex::new(ControlState {
                running: false,
                delay,
                reset_requested: false,
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let controller = Controller {
            control: Arc::clone(&control),
            obstacles: obstacles.clone(),
            start: search.start_position(),
            goal: search.goal_position(),
        };

        let handle = thread::Builder::new()
            .name("search".into())
            .spawn(move || run_loop(search, obstacles, &control, notifications))
            .map_err(Error::WorkerSpawn)?;

        Ok(SearchWorker { controller, handle })
    }

    pub fn controller(&self) -> Controller {
        self.controller.clone()
    }

    /// Asks the worker to exit and waits for its statistics.
    pub fn shutdown(self) -> Result<RunStatistics> {
        self.controller.submit(Command::Shutdown);
        self.join()
    }

    /// Waits for the worker to exit on its own.
    pub fn join(self) -> Result<RunStatistics> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)?
    }
}

enum Wake {
    Step,
    Reset,
    Shutdown,
}

fn wait_for_work(control: &Control, search: &mut AStarSearch) -> Wake {
    let mut state = control.state.lock();
    loop {
        if state.shutdown {
            return Wake::Shutdown;
        }
        if state.reset_requested {
            state.reset_requested = false;
            return Wake::Reset;
        }
        if state.running && !search.is_complete() {
            search.start();
            return Wake::Step;
        }
        search.stop();
        control.wake.wait(&mut state);
    }
}

fn wait_delay(control: &Control, stepped_at: Instant) {
    let mut state = control.state.lock();
    while !state.shutdown && !state.reset_requested {
        let deadline = stepped_at + state.delay;
        if Instant::now() >= deadline {
            break;
        }
        control.wake.wait_until(&mut state, deadline);
    }
}

fn run_loop(
    mut search: AStarSearch,
    obstacles: ObstacleSet,
    control: &Control,
    notifications: NotificationSender,
) -> Result<RunStatistics> {
    debug!(
        "search worker ready: {} -> {}",
        search.start_position(),
        search.goal_position()
    );
    let mut stats = RunStatistics::new();

    loop {
        match wait_for_work(control, &mut search) {
            Wake::Shutdown => {
                debug!("search worker exiting");
                return Ok(stats);
            }
            Wake::Reset => {
                search.reset();
                stats = RunStatistics::new();
                debug!("search reset to {}", search.start_position());
                continue;
            }
            Wake::Step => {}
        }

        let stepped_at = Instant::now();
        let step = search.step(&obstacles).inspect_err(|e| error!("search aborted: {}", e))?;
        stats.record(&step);

        if search.is_complete() {
            stats.finish(
                search.geometry(),
                search.start_position(),
                search.goal_position(),
                &obstacles.snapshot(),
            );
            info!(
                "search completed after exploring {} tiles ({} discarded)",
                stats.explored, stats.discarded
            );
        }

        for notification in step.notifications() {
            if notifications.send(notification).is_err() {
                debug!("notification receiver dropped, stopping search worker");
                return Ok(stats);
            }
        }

        if step.consumed_tick() {
            wait_delay(control, stepped_at);
        }
    }
}
