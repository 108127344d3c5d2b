//! Obstacle spawning
//!
//! Once per spawn tick the spawner rolls against a probability that climbs
//! with the score. A successful roll creates exactly one obstacle at the top
//! edge with randomized x, width and height.

use super::collision::Rect;
use super::rng::{RandomSource, clamp_unit};
use crate::config::Config;

/// Chance that a spawn tick creates an obstacle at the given score
pub fn spawn_probability(score: u32, config: &Config) -> f32 {
    (config.spawn_chance_base + score as f32 * config.spawn_chance_per_point)
        .min(config.spawn_chance_cap)
}

/// Roll for a new obstacle. Returns its bounds on success.
///
/// Draw order is fixed: the decision sample, then x, width, height.
pub fn decide(score: u32, config: &Config, rng: &mut dyn RandomSource) -> Option<Rect> {
    let roll = clamp_unit(rng.next_unit());
    if roll >= spawn_probability(score, config) {
        return None;
    }

    let x = clamp_unit(rng.next_unit()) * config.max_spawn_x();
    let width = lerp(
        config.obstacle_min_width,
        config.obstacle_max_width,
        clamp_unit(rng.next_unit()),
    );
    let height = lerp(
        config.obstacle_min_height,
        config.obstacle_max_height,
        clamp_unit(rng.next_unit()),
    );

    Some(Rect::new(x, 0.0, width, height))
}

#[inline]
fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}
