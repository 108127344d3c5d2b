//! Fixed-period round transitions
//!
//! Every function here is a pure state transition: given the round state and
//! config it mutates the state and reports what happened as [`GameEvent`]s.
//! Nothing here knows about clocks, storage or the best score.

use super::collision::first_collision;
use super::rng::RandomSource;
use super::spawner;
use super::state::{Direction, GameEvent, GameMode, GameState, Obstacle};
use crate::config::Config;

/// Advance the round by one simulation tick.
///
/// Order within a tick is fixed:
/// 1. every obstacle moves down by the current speed
/// 2. obstacles past the bottom edge are removed and scored (speed ramps per point)
/// 3. the vehicle is tested against what remains; any overlap ends the round
///
/// An obstacle that exits on the same tick it would have hit therefore scores.
pub fn tick(state: &mut GameState, config: &Config, events: &mut Vec<GameEvent>) {
    if state.mode == GameMode::GameOver {
        return;
    }

    state.ticks += 1;

    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.bounds.pos.y += speed;
    }

    let bottom = config.playfield_height;
    let mut survived = Vec::new();
    state.obstacles.retain(|o| {
        if o.bounds.top() > bottom {
            survived.push(o.id);
            false
        } else {
            true
        }
    });
    for id in survived {
        state.score += 1;
        state.speed += config.speed_increment;
        log::debug!("Obstacle {} survived, score {}", id, state.score);
        events.push(GameEvent::Survived {
            id,
            score: state.score,
        });
    }

    let vehicle = state.vehicle.bounds();
    if let Some(index) = first_collision(&vehicle, state.obstacles.iter().map(|o| &o.bounds)) {
        let id = state.obstacles[index].id;
        state.mode = GameMode::GameOver;
        log::info!("Collision with obstacle {} at score {}", id, state.score);
        events.push(GameEvent::Collision {
            id,
            score: state.score,
        });
    }
}

/// Run one spawn decision. At most one obstacle per call.
pub fn spawn_tick(
    state: &mut GameState,
    config: &Config,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) {
    if state.mode == GameMode::GameOver {
        return;
    }

    if let Some(bounds) = spawner::decide(state.score, config, rng) {
        let id = state.next_obstacle_id();
        log::debug!(
            "Spawned obstacle {} at x={:.1} ({:.1}x{:.1})",
            id,
            bounds.pos.x,
            bounds.size.x,
            bounds.size.y
        );
        state.obstacles.push(Obstacle { id, bounds });
        events.push(GameEvent::Spawned { id });
    }
}

/// Shift the vehicle one lane. Ignored once the round is over.
pub fn move_vehicle(state: &mut GameState, config: &Config, direction: Direction) -> bool {
    if state.mode == GameMode::GameOver {
        return false;
    }
    state.vehicle.step(direction, config);
    true
}

/// Start a new round. Only accepted while the round is over.
pub fn reset(state: &mut GameState, config: &Config, events: &mut Vec<GameEvent>) -> bool {
    if state.mode != GameMode::GameOver {
        return false;
    }
    *state = GameState::new(config);
    log::info!("Round reset");
    events.push(GameEvent::RoundReset);
    true
}
