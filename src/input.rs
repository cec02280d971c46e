//! Input arbitration: keyboard keys, swipes and clicks reduced to engine
//! commands. Pure decisions only; `surface` owns the actual listeners.

use crate::game::Lifecycle;
use crate::grid::Direction;

/// A keyboard key the game claims. Every other key is left to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Turn(Direction),
    TogglePause,
    Start,
}

impl KeyCommand {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<KeyCommand> {
        let cmd = match key {
            "ArrowUp" | "w" | "W" => KeyCommand::Turn(Direction::Up),
            "ArrowDown" | "s" | "S" => KeyCommand::Turn(Direction::Down),
            "ArrowLeft" | "a" | "A" => KeyCommand::Turn(Direction::Left),
            "ArrowRight" | "d" | "D" => KeyCommand::Turn(Direction::Right),
            " " | "p" | "P" => KeyCommand::TogglePause,
            "Enter" => KeyCommand::Start,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Tracks one touch from start to end and classifies it as a swipe.
#[derive(Clone, Copy, Debug)]
pub struct SwipeTracker {
    threshold: f64,
    origin: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, origin: None }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
    }

    /// Finish the gesture. The dominant axis decides horizontal vs vertical,
    /// its sign decides the direction. Travel under the threshold is a tap.
    pub fn end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (ox, oy) = self.origin.take()?;
        classify_swipe(x - ox, y - oy, self.threshold)
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}

pub fn classify_swipe(dx: f64, dy: f64, threshold: f64) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < threshold {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Click-outside policy: a pointer press landing neither on the game surface
/// nor on one of its controls pauses a running round.
pub fn should_pause_on_click(inside_surface: bool, on_control: bool, lifecycle: Lifecycle) -> bool {
    !inside_surface && !on_control && lifecycle == Lifecycle::Running
}
