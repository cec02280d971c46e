//! Snake simulation and its lifecycle state machine.
//!
//! The engine is pure: no DOM, no timers. `surface` drives it with a fixed
//! interval and renders whatever it exposes, so everything here runs under a
//! native `cargo test`.
//!
//! Lifecycle: `Idle -> Running <-> Paused`, `Running -> Over` on
//! self-collision, and `start()` from `Idle` or `Over` resets the board.

mod food;

use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::{Direction, Grid, Position, compute_grid};

pub use food::Food;

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifecycle {
    /// Before the first start: overlay visible, nothing ticks.
    Idle,
    Running,
    Paused,
    /// Self-collision ended the round; terminal until restarted.
    Over,
}

/// What a single tick did. The surface maps these to sounds and redraws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    Moved,
    Ate { score: u32, impact: u32 },
    Over { score: u32, impact: u32 },
}

/// Read-only view handed to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub score: u32,
    pub impact: u32,
    pub lifecycle: Lifecycle,
    pub length: usize,
}

pub struct Engine<R = SmallRng> {
    config: EngineConfig,
    // Latest surface measurement; may be newer than `grid` while a round runs.
    measured: Result<Grid, EngineError>,
    // Grid the simulation runs on.
    grid: Option<Grid>,
    snake: VecDeque<Position>,
    velocity: Direction,
    pending: Option<Direction>,
    food: Option<Food>,
    score: u32,
    impact: u32,
    lifecycle: Lifecycle,
    rng: R,
}

impl Engine<SmallRng> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self {
            config,
            measured: Err(EngineError::NoGrid),
            grid: None,
            snake: VecDeque::from([Position::new(0, 0)]),
            velocity: Direction::Right,
            pending: None,
            food: None,
            score: 0,
            impact: 0,
            lifecycle: Lifecycle::Idle,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn impact(&self) -> u32 {
        self.impact
    }

    pub fn grid(&self) -> Option<Grid> {
        self.grid
    }

    /// Head first.
    pub fn snake(&self) -> &VecDeque<Position> {
        &self.snake
    }

    pub fn head(&self) -> Position {
        // The body is never empty.
        self.snake[0]
    }

    pub fn velocity(&self) -> Direction {
        self.velocity
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            impact: self.impact,
            lifecycle: self.lifecycle,
            length: self.snake.len(),
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running | Lifecycle::Paused)
    }

    /// Report a new surface size in pixels.
    ///
    /// Outside a round the grid is replaced immediately. During a round it is
    /// only replaced when the body and food still fit; otherwise it waits for
    /// the next `start()`.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<Grid, EngineError> {
        self.measured = compute_grid(width, height, self.config.cell_size);
        let grid = self.measured.clone()?;
        if !self.is_active() {
            self.grid = Some(grid);
            if self.lifecycle == Lifecycle::Idle {
                self.snake = VecDeque::from([grid.center()]);
            }
        } else if self.fits(&grid) {
            self.grid = Some(grid);
        } else {
            debug!("resize to {}x{} deferred until restart", grid.columns, grid.rows);
        }
        Ok(grid)
    }

    fn fits(&self, grid: &Grid) -> bool {
        self.snake.iter().all(|p| grid.contains(*p))
            && self.food.is_none_or(|f| grid.contains(f.position))
    }

    /// Begin a round, or resume one that is paused.
    ///
    /// From `Idle`/`Over` this resets score, impact and body, faces right and
    /// places the first brand. Refuses to run without a valid grid.
    pub fn start(&mut self) -> Result<Lifecycle, EngineError> {
        match self.lifecycle {
            Lifecycle::Running => return Ok(Lifecycle::Running),
            Lifecycle::Paused => {
                self.resume();
                return Ok(self.lifecycle);
            }
            Lifecycle::Idle | Lifecycle::Over => {}
        }
        let grid = match &self.measured {
            Ok(grid) => *grid,
            Err(err) => {
                warn!("refusing to start: {err}");
                return Err(err.clone());
            }
        };
        self.grid = Some(grid);
        self.score = 0;
        self.impact = 0;
        self.snake = VecDeque::from([grid.center()]);
        self.velocity = Direction::Right;
        self.pending = None;
        self.food = food::place_food(
            &grid,
            &self.snake,
            self.config.brand_count,
            self.config.food_retry_limit,
            &mut self.rng,
        );
        self.lifecycle = Lifecycle::Running;
        debug!("round started on {}x{} grid", grid.columns, grid.rows);
        Ok(self.lifecycle)
    }

    /// `Running -> Paused`. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        self.lifecycle = Lifecycle::Paused;
        debug!("paused at score {}", self.score);
        true
    }

    /// `Paused -> Running`, without touching any other state.
    pub fn resume(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Paused {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        debug!("resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Running => self.pause(),
            Lifecycle::Paused => self.resume(),
            Lifecycle::Idle | Lifecycle::Over => false,
        }
    }

    /// Pause requested by something other than the player (chat opening,
    /// popup closing). Safe to call in any state.
    pub fn force_pause(&mut self) -> bool {
        self.pause()
    }

    /// Queue a turn for the next tick.
    ///
    /// A turn straight back into the current velocity is dropped. Turns made
    /// between two ticks overwrite each other. From `Idle`/`Over` a turn starts
    /// a new round first; while `Paused` it is ignored. Returns whether the
    /// turn was queued.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        match self.lifecycle {
            Lifecycle::Paused => return false,
            Lifecycle::Idle | Lifecycle::Over => {
                if self.start().is_err() {
                    return false;
                }
            }
            Lifecycle::Running => {}
        }
        if dir == self.velocity.opposite() {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Place a brand on a chosen free cell instead of a random one.
    pub fn place_food_at(&mut self, position: Position, brand: usize) -> bool {
        let Some(grid) = self.grid else {
            return false;
        };
        if !grid.contains(position) || self.snake.contains(&position) {
            return false;
        }
        let brand = brand.min(self.config.brand_count.saturating_sub(1));
        self.food = Some(Food { position, brand });
        true
    }

    /// Advance one cell. Only does anything while `Running`.
    pub fn tick(&mut self) -> TickOutcome {
        if self.lifecycle != Lifecycle::Running {
            return TickOutcome::Idle;
        }
        let Some(grid) = self.grid else {
            return TickOutcome::Idle;
        };
        if let Some(dir) = self.pending.take() {
            self.velocity = dir;
        }
        let head = grid.step(self.head(), self.velocity);
        if self.snake.contains(&head) {
            self.lifecycle = Lifecycle::Over;
            info!("game over: score {} impact {}", self.score, self.impact);
            return TickOutcome::Over { score: self.score, impact: self.impact };
        }
        self.snake.push_front(head);
        if self.food.is_some_and(|f| f.position == head) {
            self.score = self.score.saturating_add(self.config.score_per_food);
            self.impact = self.impact.saturating_add(self.config.impact_per_food);
            self.food = food::place_food(
                &grid,
                &self.snake,
                self.config.brand_count,
                self.config.food_retry_limit,
                &mut self.rng,
            );
            TickOutcome::Ate { score: self.score, impact: self.impact }
        } else {
            self.snake.pop_back();
            TickOutcome::Moved
        }
    }
}
