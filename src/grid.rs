//! Playfield geometry: the discrete grid derived from the drawing surface,
//! cell positions and the four cardinal directions the snake can travel.

use crate::error::EngineError;

/// Discrete board derived from the surface size. Immutable per resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cell_size: u32,
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.columns && (pos.y as u32) < self.rows
    }

    pub fn center(&self) -> Position {
        Position::new((self.columns / 2) as i32, (self.rows / 2) as i32)
    }

    /// Moves one cell from `pos` along `dir`, wrapping each axis independently
    /// ("infinite walls": leaving one edge re-enters from the opposite one).
    pub fn step(&self, pos: Position, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(
            (pos.x + dx).rem_euclid(self.columns as i32),
            (pos.y + dy).rem_euclid(self.rows as i32),
        )
    }

    /// Row-major iteration over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows as i32)
            .flat_map(move |y| (0..self.columns as i32).map(move |x| Position::new(x, y)))
    }
}

/// Derive the grid for a surface of `width` x `height` pixels.
///
/// Fractional pixel sizes (DOM rectangles) are floored. A surface that cannot
/// hold at least one full cell is a configuration error.
pub fn compute_grid(width: f64, height: f64, cell_size: u32) -> Result<Grid, EngineError> {
    let invalid = EngineError::InvalidGrid { width, height, cell_size };
    if cell_size == 0 || !width.is_finite() || !height.is_finite() {
        return Err(invalid);
    }
    let columns = (width / cell_size as f64).floor();
    let rows = (height / cell_size as f64).floor();
    if columns < 1.0 || rows < 1.0 {
        return Err(invalid);
    }
    Ok(Grid { cell_size, columns: columns as u32, rows: rows as u32 })
}

/// Integer cell coordinate, `(0,0)` is the top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal travel direction. The snake velocity is always one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit vector in screen coordinates (y grows downward).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse the names used by the page's on-screen buttons. Case-insensitive;
    /// anything else is `None`.
    pub fn parse(name: &str) -> Option<Direction> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}
