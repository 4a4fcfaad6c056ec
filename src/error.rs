use thiserror::Error;

/// Rejected game configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must be at least {min} columns wide, got {cols}")]
    GridTooNarrow { cols: usize, min: usize },

    #[error("grid must be at least {min} rows tall, got {rows}")]
    GridTooShort { rows: usize, min: usize },

    #[error("grid of {cols}x{rows} cells is too large to draw (max {max_cols}x{max_rows})")]
    GridTooLarge {
        cols: usize,
        rows: usize,
        max_cols: usize,
        max_rows: usize,
    },

    #[error("board is {actual_cols}x{actual_rows} but the config asks for {cols}x{rows}")]
    GridMismatch {
        cols: usize,
        rows: usize,
        actual_cols: usize,
        actual_rows: usize,
    },

    #[error("initial drop interval must be greater than zero")]
    ZeroDropInterval,

    #[error("speed-up factor must be in (0, 1], got {0}")]
    InvalidSpeedUp(f64),
}
