use crate::error::{Error, Result};
use crate::worker::{validate_delay, DEFAULT_DELAY_MS};
use clap::Parser;

/// Watch a best-first grid search explore around walls, step by step.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Side length of the square grid
    #[arg(long, default_value_t = 100)]
    pub grid_size: usize,

    /// Delay between explored tiles, 1..=100 ms
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Wall each cell with probability 1/N before starting (0 disables)
    #[arg(long, default_value_t = 0)]
    pub maze_chance: u32,

    /// Seed for the generated maze
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read control commands (start, stop, speed <ms>, wall <r> <c>, ...) from stdin
    #[arg(long, default_value_t = false)]
    pub interactive: bool,

    /// Redraw the grid every N notifications
    #[arg(long, default_value_t = 250)]
    pub render_every: usize,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: 100,
            delay_ms: DEFAULT_DELAY_MS,
            maze_chance: 0,
            seed: None,
            interactive: false,
            render_every: 250,
            no_visualization: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                self.grid_size
            )));
        }
        if self.render_every == 0 {
            return Err(Error::InvalidConfig("render cadence must be at least 1".into()));
        }
        validate_delay(self.delay_ms).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}
