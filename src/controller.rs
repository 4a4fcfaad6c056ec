//! Game loop controller: lifecycle, drop interval and tick scheduling.
//!
//! The controller never sleeps. The front end asks it how long until the
//! next tick, waits for input up to that long, then calls [`GameLoop::poll`].

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{Game, GameEvent, Intent, Landing, MoveOutcome};
use crate::piece::{PieceProvider, RandomPieceProvider};
use crate::scheduler::TickScheduler;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    NotStarted,
    Running,
    Paused,
    Over,
}

pub struct GameLoop {
    game: Game,
    status: Status,
    initial_drop: Duration,
    drop_interval: Duration,
    speed_up: f64,
    scheduler: TickScheduler,
}

impl GameLoop {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_provider(config, Box::new(RandomPieceProvider::from_seed(config.seed)))
    }

    pub fn with_provider(
        config: &GameConfig,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_game(Game::from_config(config, provider), config)
    }

    /// Wraps an existing board. The first [`start`](Self::start) plays on
    /// it as-is; later starts reset it. The board must match the
    /// configured grid size, and scoring follows the config.
    pub fn with_game(mut game: Game, config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (actual_cols, actual_rows) = (game.grid.cols(), game.grid.rows());
        if (actual_cols, actual_rows) != (config.cols, config.rows) {
            return Err(ConfigError::GridMismatch {
                cols: config.cols,
                rows: config.rows,
                actual_cols,
                actual_rows,
            });
        }
        game.set_points_per_row(config.points_per_row);

        Ok(Self {
            game,
            status: Status::NotStarted,
            initial_drop: config.initial_drop,
            drop_interval: config.initial_drop,
            speed_up: config.speed_up,
            scheduler: TickScheduler::new(),
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn score(&self) -> u32 {
        self.game.score
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn has_pending_tick(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Time until the pending tick, `None` when nothing is scheduled.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.scheduler.remaining(now)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.game.take_events()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Starts play, or restarts it from scratch if a game already ran.
    pub fn start(&mut self, now: Instant) {
        self.scheduler.cancel();
        if self.status != Status::NotStarted {
            self.game.reset();
        }
        self.drop_interval = self.initial_drop;
        self.status = Status::Running;
        self.scheduler.schedule(now, self.drop_interval);

        info!(interval_ms = self.drop_interval.as_millis() as u64, "game started");
        self.game.push_event(GameEvent::Started);
    }

    pub fn pause(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.status = Status::Paused;
        self.scheduler.cancel();

        info!(score = self.game.score, "paused");
        self.game.push_event(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if self.status != Status::Paused {
            return false;
        }
        self.status = Status::Running;
        self.scheduler.schedule(now, self.drop_interval);

        info!("resumed");
        self.game.push_event(GameEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        match self.status {
            Status::Running => {
                self.pause();
            }
            Status::Paused => {
                self.resume(now);
            }
            Status::NotStarted | Status::Over => {}
        }
    }

    // ------------------------------------------------------------------------
    // Ticks and input
    // ------------------------------------------------------------------------

    /// Runs the pending tick if it is due. Returns whether one ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.scheduler.fire(now) {
            self.tick(now);
            true
        } else {
            false
        }
    }

    /// One gravity step. Ends the game instead if the top row holds blocks.
    pub fn tick(&mut self, now: Instant) {
        if self.status != Status::Running {
            return;
        }
        if self.game.top_row_blocked() {
            self.finish();
            return;
        }

        if let Some(landing) = self.game.soft_drop().landing() {
            self.after_landing(landing, now);
        }

        if self.status == Status::Running {
            self.scheduler.schedule(now, self.drop_interval);
        }
    }

    /// Applies a player intent. Ignored unless the game is running.
    pub fn apply(&mut self, intent: Intent, now: Instant) -> Option<MoveOutcome> {
        if self.status != Status::Running {
            return None;
        }

        let outcome = self.game.apply(intent);
        if let Some(landing) = outcome.landing() {
            self.after_landing(landing, now);
        }
        Some(outcome)
    }

    fn after_landing(&mut self, landing: Landing, now: Instant) {
        if landing.rows_cleared > 0 {
            // no floor: the interval keeps shrinking with every clearing landing
            self.drop_interval = self.drop_interval.mul_f64(self.speed_up);
            info!(
                interval_ms = self.drop_interval.as_secs_f64() * 1000.0,
                "drop interval shortened"
            );
            self.game.push_event(GameEvent::SpeedUp(self.drop_interval));

            if self.scheduler.is_pending() {
                self.scheduler.schedule(now, self.drop_interval);
            }
        }

        if landing.spawn_blocked {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.status = Status::Over;
        self.scheduler.cancel();

        info!(score = self.game.score, "game over");
        self.game.push_event(GameEvent::GameOver);
    }
}
