//! Error types for the pathfinding visualizer

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Visualizer error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Coordinate outside the `size x size` grid
    #[error("Invalid position: ({row}, {column}) is outside a {size}x{size} grid")]
    InvalidPosition {
        /// Requested row
        row: i64,
        /// Requested column
        column: i64,
        /// Side length of the grid
        size: usize,
    },

    /// Step delay outside the accepted range
    #[error("Invalid speed: {0}ms (expected 1..=100)")]
    InvalidSpeed(u64),

    /// Control command text that could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Rejected startup configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Engine defect, never recovered from
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Worker thread could not be started
    #[error("Failed to spawn search worker: {0}")]
    WorkerSpawn(std::io::Error),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker thread panicked before reporting
    #[error("Search worker panicked")]
    WorkerPanicked,
}
