//! The interactive loop that sits between a command source, the search
//! worker and the terminal canvas.

use crate::display::Canvas;
use crate::error::Result;
use crate::notification::{Command, Notification, NotificationReceiver};
use crate::worker::Controller;
use crossbeam_channel::{never, select, Receiver, RecvTimeoutError};
use log::debug;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Redraw the canvas every N notifications (and on run completion).
    pub render_every: usize,
    pub visualize: bool,
    pub quiet: bool,
    /// Keep going after a run completes while commands may still arrive.
    pub interactive: bool,
}

/// Pumps notifications onto the canvas and commands into the worker until
/// the session is over.
///
/// A closed command source never cuts a run short: the session keeps
/// draining until the run completes, or stops right away if the search is
/// paused or already finished, since nothing could resume it.
pub fn drive<W: Write>(
    notifications: &NotificationReceiver,
    commands: Receiver<Command>,
    controller: &Controller,
    canvas: &mut Canvas,
    options: SessionOptions,
    out: &mut W,
) -> Result<()> {
    let mut commands = commands;
    let mut commands_open = true;
    let mut received = 0usize;

    loop {
        let mut closed_now = false;

        select! {
            recv(notifications.inner()) -> notification => {
                let Ok(notification) = notification else {
                    debug!("search worker closed its notification channel");
                    return Ok(());
                };
                received += 1;
                let done = canvas.apply(&notification);

                if options.visualize && (done || received % options.render_every == 0) {
                    writeln!(out, "{}", canvas.render(controller.obstacles()))?;
                }
                if done {
                    if let Notification::PathFound(path) = &notification {
                        if !options.quiet {
                            writeln!(out, "Path: {}", path)?;
                        }
                    }
                    if !options.interactive || !commands_open {
                        return Ok(());
                    }
                }
            }
            recv(commands) -> command => match command {
                Ok(Command::Shutdown) => {
                    controller.submit(Command::Shutdown);
                    return Ok(());
                }
                Ok(Command::Reset) => {
                    controller.submit(Command::Reset);
                    discard_previous_run(notifications, controller);
                    canvas.clear_progress();
                }
                Ok(command) => controller.submit(command),
                Err(_) => closed_now = true,
            },
        }

        if closed_now {
            debug!("command source closed");
            commands_open = false;
            commands = never();
            if canvas.outcome().is_some() || !controller.is_running() {
                return Ok(());
            }
        }
    }
}

/// Throws away notifications the worker produced before it picked up a
/// reset. Once the reset is taken, the old run cannot send anything more.
fn discard_previous_run(notifications: &NotificationReceiver, controller: &Controller) {
    while controller.reset_pending() {
        if let Err(RecvTimeoutError::Disconnected) =
            notifications.recv_timeout(Duration::from_millis(1))
        {
            return;
        }
    }
    while notifications.try_recv().is_ok() {}
}
