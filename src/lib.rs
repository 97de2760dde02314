//! Stepwise, pausable grid search with a background worker, for watching
//! exploration unfold while walls are edited concurrently.

pub mod algorithms;
pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod maze;
pub mod notification;
pub mod obstacles;
pub mod session;
pub mod statistics;
pub mod worker;

pub use algorithms::a_star::{AStarSearch, SearchOutcome, SearchState, StepOutcome};
pub use error::{Error, Result};
pub use grid::{GridGeometry, Position};
pub use notification::{Command, Notification};
pub use obstacles::ObstacleSet;
pub use worker::{Controller, SearchWorker};
