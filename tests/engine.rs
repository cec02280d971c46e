// Integration tests (native) for the snake engine.
// Everything here runs on the host; randomness is seeded for repeatability.

use std::collections::HashSet;

use eat_the_brands::{Direction, Engine, EngineConfig, Lifecycle, Position, TickOutcome};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// 500x375 px at 25 px per cell is the 20x15 board.
fn scenario_engine(seed: u64) -> Engine<SmallRng> {
    let mut engine = Engine::with_rng(EngineConfig::desktop(), SmallRng::seed_from_u64(seed));
    engine.resize(500.0, 375.0).unwrap();
    engine
}

/// Start a round and grow the snake to `len` by feeding it straight ahead.
fn grown_snake(len: usize) -> Engine<SmallRng> {
    let mut engine = scenario_engine(11);
    engine.start().unwrap();
    for step in 1..len {
        assert!(engine.place_food_at(Position::new(10 + step as i32, 7), 0));
        assert!(matches!(engine.tick(), TickOutcome::Ate { .. }));
    }
    // Park the next brand out of the way.
    assert!(engine.place_food_at(Position::new(0, 0), 0));
    engine
}

#[test]
fn five_ticks_straight_right() {
    let mut engine = scenario_engine(1);
    assert_eq!(engine.start(), Ok(Lifecycle::Running));
    assert_eq!(engine.head(), Position::new(10, 7));
    assert_eq!(engine.velocity(), Direction::Right);
    assert!(engine.place_food_at(Position::new(0, 0), 0));
    for _ in 0..5 {
        assert_eq!(engine.tick(), TickOutcome::Moved);
    }
    assert_eq!(engine.head(), Position::new(15, 7));
    assert_eq!(engine.snake().len(), 1);
    assert_eq!(engine.score(), 0);
}

#[test]
fn eating_a_brand_scores_and_grows() {
    let mut engine = scenario_engine(2);
    engine.start().unwrap();
    assert!(engine.place_food_at(Position::new(11, 7), 2));
    assert_eq!(engine.tick(), TickOutcome::Ate { score: 10, impact: 15 });
    assert_eq!(engine.score(), 10);
    assert_eq!(engine.impact(), 15);
    assert_eq!(engine.snake().len(), 2);
    let food = engine.food().expect("a new brand is placed");
    assert!(!engine.snake().contains(&food.position));
}

#[test]
fn reversal_request_is_dropped() {
    let mut engine = scenario_engine(3);
    engine.start().unwrap();
    assert!(engine.place_food_at(Position::new(0, 0), 0));
    assert!(!engine.set_direction(Direction::Left));
    engine.tick();
    assert_eq!(engine.velocity(), Direction::Right);
    assert_eq!(engine.head(), Position::new(11, 7));
}

#[test]
fn turning_up_then_down_keeps_going_up() {
    let mut engine = grown_snake(4);
    assert_eq!(engine.snake().len(), 4);
    assert_eq!(engine.head(), Position::new(13, 7));
    assert!(engine.set_direction(Direction::Up));
    engine.tick();
    engine.tick();
    assert!(!engine.set_direction(Direction::Down));
    engine.tick();
    assert_eq!(engine.velocity(), Direction::Up);
    assert_eq!(engine.head(), Position::new(13, 4));
    assert_eq!(engine.lifecycle(), Lifecycle::Running);
}

#[test]
fn self_collision_ends_the_round_with_frozen_score() {
    let mut engine = grown_snake(5);
    assert_eq!(engine.score(), 40);
    engine.set_direction(Direction::Up);
    assert_eq!(engine.tick(), TickOutcome::Moved);
    engine.set_direction(Direction::Left);
    assert_eq!(engine.tick(), TickOutcome::Moved);
    engine.set_direction(Direction::Down);
    let body_before: Vec<Position> = engine.snake().iter().copied().collect();
    assert_eq!(engine.tick(), TickOutcome::Over { score: 40, impact: 60 });
    assert_eq!(engine.lifecycle(), Lifecycle::Over);
    // The body is not advanced into itself.
    assert_eq!(engine.snake().iter().copied().collect::<Vec<_>>(), body_before);
    // Over is terminal: ticks do nothing, pausing does nothing.
    assert_eq!(engine.tick(), TickOutcome::Idle);
    assert!(!engine.force_pause());
    assert_eq!(engine.score(), 40);
}

#[test]
fn restart_after_game_over_resets_counters() {
    let mut engine = grown_snake(5);
    engine.set_direction(Direction::Up);
    engine.tick();
    engine.set_direction(Direction::Left);
    engine.tick();
    engine.set_direction(Direction::Down);
    engine.tick();
    assert_eq!(engine.lifecycle(), Lifecycle::Over);
    assert_eq!(engine.start(), Ok(Lifecycle::Running));
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.impact(), 0);
    assert_eq!(engine.snake().len(), 1);
    assert_eq!(engine.head(), Position::new(10, 7));
    assert_eq!(engine.velocity(), Direction::Right);
}

#[test]
fn turn_after_game_over_restarts() {
    let mut engine = grown_snake(5);
    engine.set_direction(Direction::Up);
    engine.tick();
    engine.set_direction(Direction::Left);
    engine.tick();
    engine.set_direction(Direction::Down);
    assert!(matches!(engine.tick(), TickOutcome::Over { score: 40, impact: 60 }));

    assert!(engine.set_direction(Direction::Up));
    assert_eq!(engine.lifecycle(), Lifecycle::Running);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.impact(), 0);
    assert_eq!(engine.snake().len(), 1);
    assert!(engine.place_food_at(Position::new(0, 0), 0));
    assert_eq!(engine.tick(), TickOutcome::Moved);
    assert_eq!(engine.head(), Position::new(10, 6));
}

#[test]
fn reversing_turn_after_game_over_still_restarts() {
    let mut engine = grown_snake(5);
    engine.set_direction(Direction::Up);
    engine.tick();
    engine.set_direction(Direction::Left);
    engine.tick();
    engine.set_direction(Direction::Down);
    engine.tick();
    assert_eq!(engine.lifecycle(), Lifecycle::Over);

    assert!(!engine.set_direction(Direction::Left));
    assert_eq!(engine.lifecycle(), Lifecycle::Running);
    assert_eq!(engine.velocity(), Direction::Right);
}

#[test]
fn pause_and_resume_preserve_state() {
    let mut engine = grown_snake(3);
    let body: Vec<Position> = engine.snake().iter().copied().collect();
    let score = engine.score();
    assert!(engine.pause());
    assert_eq!(engine.lifecycle(), Lifecycle::Paused);
    assert_eq!(engine.tick(), TickOutcome::Idle);
    assert!(engine.resume());
    assert_eq!(engine.lifecycle(), Lifecycle::Running);
    assert_eq!(engine.score(), score);
    assert_eq!(engine.snake().iter().copied().collect::<Vec<_>>(), body);
}

#[test]
fn force_pause_is_a_no_op_outside_running() {
    let mut engine = scenario_engine(4);
    assert!(!engine.force_pause());
    assert_eq!(engine.lifecycle(), Lifecycle::Idle);
    assert!(!engine.resume());
    assert_eq!(engine.lifecycle(), Lifecycle::Idle);
    engine.start().unwrap();
    assert!(engine.force_pause());
    assert!(!engine.force_pause());
    assert_eq!(engine.lifecycle(), Lifecycle::Paused);
}

#[test]
fn wraparound_keeps_head_on_the_board() {
    let mut engine = scenario_engine(5);
    engine.start().unwrap();
    assert!(engine.place_food_at(Position::new(0, 0), 0));
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.head(), Position::new(0, 7));
}

// Random play on a small board: every tick keeps the structural invariants.
#[test]
fn random_play_preserves_invariants() {
    let mut config = EngineConfig::desktop();
    config.cell_size = 10;
    let mut driver = SmallRng::seed_from_u64(2024);
    for seed in 0..20u64 {
        let mut engine = Engine::with_rng(config.clone(), SmallRng::seed_from_u64(seed));
        let grid = engine.resize(80.0, 60.0).unwrap();
        engine.start().unwrap();
        for _ in 0..400 {
            let dir = Direction::ALL[driver.gen_range(0..4)];
            engine.set_direction(dir);
            let score_before = engine.score();
            let impact_before = engine.impact();
            let outcome = engine.tick();

            assert!(grid.contains(engine.head()));
            assert!(engine.score() >= score_before);
            assert!(engine.score() - score_before <= 10);
            assert!(engine.impact() - impact_before <= 15);
            let len = engine.snake().len();
            assert!(len >= 1 && len <= grid.cell_count());

            match outcome {
                TickOutcome::Over { score, .. } => {
                    assert_eq!(score, engine.score());
                    assert_eq!(engine.lifecycle(), Lifecycle::Over);
                    engine.start().unwrap();
                }
                _ => {
                    let unique: HashSet<Position> = engine.snake().iter().copied().collect();
                    assert_eq!(unique.len(), len, "body overlaps itself while running");
                    if let Some(food) = engine.food() {
                        assert!(!engine.snake().contains(&food.position));
                        assert!(grid.contains(food.position));
                    }
                }
            }
        }
    }
}
