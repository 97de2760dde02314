use clap::Parser;
use crossbeam_channel::{never, unbounded, Receiver};
use log::{info, warn};

use pathfinding_visualizer::config::Config;
use pathfinding_visualizer::display::Canvas;
use pathfinding_visualizer::maze;
use pathfinding_visualizer::notification::{notification_channel, NOTIFICATION_CAPACITY};
use pathfinding_visualizer::session::{self, SessionOptions};
use pathfinding_visualizer::{AStarSearch, Command, GridGeometry, ObstacleSet, Result, SearchWorker};
use std::io::BufRead;
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    if let Err(e) = run(config) {
        eprintln!("Visualizer failed: {}", e);
        std::process::exit(1);
    }
}

/// Reads commands from stdin on its own thread so the render loop never blocks on input.
fn spawn_stdin_reader() -> Result<Receiver<Command>> {
    let (tx, rx) = unbounded();

    thread::Builder::new().name("stdin".into()).spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    })?;

    Ok(rx)
}

fn run(config: Config) -> Result<()> {
    config.validate()?;

    let geometry = GridGeometry::new(config.grid_size)?;
    let start = geometry.default_start();
    let goal = geometry.default_goal();

    let obstacles = ObstacleSet::new(geometry);
    if config.maze_chance > 0 {
        let mut rng = maze::rng_from_seed(config.seed);
        obstacles.extend(maze::generate(geometry, start, goal, config.maze_chance, &mut rng))?;
    }

    info!("Grid size: {}x{}", config.grid_size, config.grid_size);
    info!("Start: {}, Goal: {}, Walls: {}", start, goal, obstacles.len());
    if config.no_visualization {
        info!("Visualization disabled");
    } else {
        info!("Visualization enabled with {}ms delay", config.delay_ms);
    }

    let search = AStarSearch::new(geometry, start, goal)?;
    let (tx, rx) = notification_channel(NOTIFICATION_CAPACITY);
    let worker = SearchWorker::spawn(
        search,
        obstacles.clone(),
        Duration::from_millis(config.delay_ms),
        tx,
    )?;
    let controller = worker.controller();

    let commands = if config.interactive {
        info!(
            "Interactive mode: start, stop, speed <ms>, wall <r> <c>, unwall <r> <c>, \
             clear, maze [n], reset, quit"
        );
        spawn_stdin_reader()?
    } else {
        controller.submit(Command::Start);
        never()
    };

    let mut canvas = Canvas::new(geometry, start, goal);
    let options = SessionOptions {
        render_every: config.render_every,
        visualize: !config.no_visualization,
        quiet: config.quiet,
        interactive: config.interactive,
    };
    session::drive(
        &rx,
        commands,
        &controller,
        &mut canvas,
        options,
        &mut std::io::stdout(),
    )?;

    let stats = worker.shutdown()?;

    if !config.quiet {
        println!("\n=== FINAL RESULTS ===");
        println!("{}", stats);
    }

    Ok(())
}
