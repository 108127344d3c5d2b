//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Injected RNG only
//! - Obstacles kept in spawn order
//! - No clock, storage or rendering dependencies

pub mod collision;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_collision, intersects};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use spawner::spawn_probability;
pub use state::{Direction, GameEvent, GameMode, GameState, Obstacle, Snapshot, Vehicle};
pub use tick::{move_vehicle, reset, spawn_tick, tick};
