//! The boundary between the search worker and whatever presents it.
//!
//! Control flows in as [`Command`]s, progress flows out as [`Notification`]s
//! over a bounded channel in the exact order nodes leave the frontier.

use crate::algorithms::node::Path;
use crate::error::{Error, Result};
use crate::grid::Position;
use crossbeam_channel::{Receiver, RecvTimeoutError, SendError, Sender, TryRecvError};
use std::str::FromStr;
use std::time::Duration;

/// Notification channel buffer size
pub const NOTIFICATION_CAPACITY: usize = 1024;

/// Progress reported by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Exploring(Position),
    PathFound(Path),
    NoPathFound,
}

impl Notification {
    /// True for the notification that ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Notification::PathFound(_) | Notification::NoPathFound)
    }
}

/// Control input accepted at any time, including mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    SetSpeed(u64),
    AddObstacle(Position),
    RemoveObstacle(Position),
    ClearObstacles,
    /// Re-seed the run from the start cell, leaving it paused.
    Reset,
    /// Block each free cell with probability `1 / chance`.
    GenerateMaze { chance: u32 },
    Shutdown,
}

fn parse_coordinate(token: Option<&str>, line: &str) -> Result<usize> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| Error::InvalidCommand(format!("expected `<row> <column>` in `{}`", line)))
}

impl FromStr for Command {
    type Err = Error;

    /// Parses one line of the textual control grammar, e.g. `wall 3 4` or `speed 20`.
    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Err(Error::InvalidCommand("empty command".into()));
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "stop" | "pause" => Command::Stop,
            "speed" => {
                let delay = tokens
                    .next()
                    .and_then(|t| t.parse::<u64>().ok())
                    .ok_or_else(|| {
                        Error::InvalidCommand(format!("expected `speed <ms>` in `{}`", line))
                    })?;
                Command::SetSpeed(delay)
            }
            "wall" | "unwall" => {
                let row = parse_coordinate(tokens.next(), line)?;
                let column = parse_coordinate(tokens.next(), line)?;
                let pos = Position::new(row, column);
                if verb.eq_ignore_ascii_case("wall") {
                    Command::AddObstacle(pos)
                } else {
                    Command::RemoveObstacle(pos)
                }
            }
            "clear" => Command::ClearObstacles,
            "reset" => Command::Reset,
            "maze" => {
                let chance = match tokens.next() {
                    Some(t) => t
                        .parse::<u32>()
                        .ok()
                        .filter(|&c| c > 0)
                        .ok_or_else(|| {
                            Error::InvalidCommand(format!(
                                "expected `maze [chance]` in `{}`",
                                line
                            ))
                        })?,
                    None => crate::maze::DEFAULT_CHANCE,
                };
                Command::GenerateMaze { chance }
            }
            "quit" | "exit" => Command::Shutdown,
            _ => return Err(Error::InvalidCommand(format!("unknown command `{}`", verb))),
        };

        if tokens.next().is_some() {
            return Err(Error::InvalidCommand(format!("trailing input in `{}`", line)));
        }
        Ok(command)
    }
}

/// Creates a new bounded notification channel pair
pub fn notification_channel(capacity: usize) -> (NotificationSender, NotificationReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (NotificationSender(tx), NotificationReceiver(rx))
}

/// Sender side of the notification channel
#[derive(Debug, Clone)]
pub struct NotificationSender(Sender<Notification>);

impl NotificationSender {
    /// Blocks while the channel is full; fails once the receiver is gone.
    pub fn send(
        &self,
        notification: Notification,
    ) -> std::result::Result<(), SendError<Notification>> {
        self.0.send(notification)
    }
}

/// Receiver side of the notification channel
#[derive(Debug)]
pub struct NotificationReceiver(Receiver<Notification>);

impl NotificationReceiver {
    /// Blocks until a notification arrives or every sender is dropped.
    pub fn recv(&self) -> Option<Notification> {
        self.0.recv().ok()
    }

    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> std::result::Result<Notification, RecvTimeoutError> {
        self.0.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> std::result::Result<Notification, TryRecvError> {
        self.0.try_recv()
    }

    pub fn iter(&self) -> impl Iterator<Item = Notification> + '_ {
        self.0.iter()
    }

    /// Underlying channel, for use with `crossbeam_channel::select!`.
    pub fn inner(&self) -> &Receiver<Notification> {
        &self.0
    }
}
