use std::time::Duration;

use crate::error::ConfigError;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COLS: usize = 10;
pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_DROP_MS: u64 = 1000;
pub const DEFAULT_SPEED_UP: f64 = 0.9;
pub const POINTS_PER_ROW: u32 = 100;

/// Terminals narrower than this many columns get the narrow layout.
pub const DEFAULT_NARROW_BELOW: u16 = 60;

/// Every catalog shape must fit the grid in any rotation.
pub const MIN_GRID_EXTENT: usize = 4;

/// Largest grid whose bordered wide layout (two columns per cell) still
/// fits terminal coordinates.
pub const MAX_COLS: usize = (u16::MAX as usize - 2) / 2;
pub const MAX_ROWS: usize = u16::MAX as usize - 2;

// ============================================================================
// Game Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cols: usize,
    pub rows: usize,
    pub initial_drop: Duration,
    /// Multiplier applied to the drop interval after each clearing landing.
    pub speed_up: f64,
    pub points_per_row: u32,
    /// Seed for the piece generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            initial_drop: Duration::from_millis(DEFAULT_DROP_MS),
            speed_up: DEFAULT_SPEED_UP,
            points_per_row: POINTS_PER_ROW,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < MIN_GRID_EXTENT {
            return Err(ConfigError::GridTooNarrow {
                cols: self.cols,
                min: MIN_GRID_EXTENT,
            });
        }
        if self.rows < MIN_GRID_EXTENT {
            return Err(ConfigError::GridTooShort {
                rows: self.rows,
                min: MIN_GRID_EXTENT,
            });
        }
        if self.cols > MAX_COLS || self.rows > MAX_ROWS {
            return Err(ConfigError::GridTooLarge {
                cols: self.cols,
                rows: self.rows,
                max_cols: MAX_COLS,
                max_rows: MAX_ROWS,
            });
        }
        if self.initial_drop.is_zero() {
            return Err(ConfigError::ZeroDropInterval);
        }
        if !(self.speed_up > 0.0 && self.speed_up <= 1.0) {
            return Err(ConfigError::InvalidSpeedUp(self.speed_up));
        }
        Ok(())
    }

    /// Validates and returns the config, for builder-style construction.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}
