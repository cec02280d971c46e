// Food placement: a single brand mark on a free cell.
use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::grid::{Grid, Position};

/// The brand currently on the board. `brand` indexes the sprite set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Food {
    pub position: Position,
    pub brand: usize,
}

/// Pick a free cell for the next brand.
///
/// Uniform random rolls first; once `retry_limit` rolls have all hit the body
/// the free cells are enumerated and one is drawn uniformly. `None` only when
/// the snake covers the whole board.
pub(crate) fn place_food<R: Rng>(
    grid: &Grid,
    snake: &VecDeque<Position>,
    brand_count: usize,
    retry_limit: u32,
    rng: &mut R,
) -> Option<Food> {
    let brand = rng.gen_range(0..brand_count.max(1));
    for _ in 0..retry_limit {
        let candidate = Position::new(
            rng.gen_range(0..grid.columns as i32),
            rng.gen_range(0..grid.rows as i32),
        );
        if !snake.contains(&candidate) {
            return Some(Food { position: candidate, brand });
        }
    }
    let occupied: HashSet<Position> = snake.iter().copied().collect();
    let free: Vec<Position> = grid.cells().filter(|p| !occupied.contains(p)).collect();
    if free.is_empty() {
        return None;
    }
    let position = free[rng.gen_range(0..free.len())];
    Some(Food { position, brand })
}
