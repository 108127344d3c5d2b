//! Round state and core simulation types
//!
//! The engine is the only writer of [`GameState`]; everything outside it reads
//! a [`Snapshot`].

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::Config;

/// Current mode of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Obstacles fall, the vehicle can move
    Playing,
    /// Round ended on impact; frozen until reset
    GameOver,
}

/// Lateral move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// The player's vehicle. Only x changes; y is fixed by the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Vehicle {
    /// Centered vehicle for a fresh round
    pub fn new(config: &Config) -> Self {
        Self {
            x: config.vehicle_start_x(),
            y: config.vehicle_y(),
            width: config.vehicle_width,
            height: config.vehicle_height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move one lane step, clamped to the playfield
    pub fn step(&mut self, direction: Direction, config: &Config) {
        let delta = match direction {
            Direction::Left => -config.lane_step,
            Direction::Right => config.lane_step,
        };
        self.x = (self.x + delta).clamp(0.0, config.max_vehicle_x());
    }
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Per-round sequence id
    pub id: u32,
    pub bounds: Rect,
}

/// Notable things that happened during a tick or command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new obstacle entered at the top edge
    Spawned { id: u32 },
    /// An obstacle left through the bottom edge and scored
    Survived { id: u32, score: u32 },
    /// The vehicle hit an obstacle
    Collision { id: u32, score: u32 },
    /// The best score was raised and should be persisted
    NewBestScore(u32),
    /// A new round began
    RoundReset,
}

/// Complete round state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    pub score: u32,
    /// Obstacle speed in units per tick
    pub speed: f32,
    pub vehicle: Vehicle,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Simulation ticks applied this round
    pub ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Fresh round: playing, empty field, score 0, initial speed, centered vehicle
    pub fn new(config: &Config) -> Self {
        Self {
            mode: GameMode::Playing,
            score: 0,
            speed: config.initial_speed,
            vehicle: Vehicle::new(config),
            obstacles: Vec::new(),
            ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle id
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing
    }
}

/// Read-only view handed to the presentation layer each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub vehicle: Rect,
    pub obstacles: Vec<Rect>,
    pub score: u32,
    pub best_score: u32,
}

impl Snapshot {
    pub fn capture(state: &GameState, best_score: u32) -> Self {
        Self {
            mode: state.mode,
            vehicle: state.vehicle.bounds(),
            obstacles: state.obstacles.iter().map(|o| o.bounds).collect(),
            score: state.score,
            best_score,
        }
    }
}
