//! Lane Dodge - a single-player lane dodge arcade loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, round state)
//! - `engine`: Owns the round, the RNG and the best score; applies commands
//! - `session`: Serializes clock triggers and queued input into the engine
//! - `platform`: Clock/scheduler and gesture input abstractions
//! - `persistence`: Best score storage port and fire-and-forget writers
//! - `config`: Data-driven game tuning

pub mod autopilot;
pub mod config;
pub mod engine;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{Config, ConfigError};
pub use engine::{Command, Engine};
pub use session::{CommandSender, Session};

/// Game configuration constants
pub mod consts {
    /// Simulation tick period in milliseconds
    pub const SIM_PERIOD_MS: u64 = 30;
    /// Spawn decision period in milliseconds
    pub const SPAWN_PERIOD_MS: u64 = 400;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Vehicle defaults
    pub const VEHICLE_WIDTH: f32 = 60.0;
    pub const VEHICLE_HEIGHT: f32 = 100.0;
    /// Distance from the playfield bottom to the vehicle's top edge
    pub const VEHICLE_BOTTOM_OFFSET: f32 = 150.0;
    /// Horizontal distance covered by one move command
    pub const LANE_STEP: f32 = 60.0;

    /// Obstacle speed (units per tick)
    pub const INITIAL_SPEED: f32 = 6.0;
    /// Speed gained per survived obstacle
    pub const SPEED_INCREMENT: f32 = 0.3;

    /// Obstacle size ranges
    pub const OBSTACLE_MIN_WIDTH: f32 = 40.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 100.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 30.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 80.0;

    /// Spawn probability curve: base + score * per_point, capped
    pub const SPAWN_CHANCE_BASE: f32 = 0.3;
    pub const SPAWN_CHANCE_PER_POINT: f32 = 0.02;
    pub const SPAWN_CHANCE_CAP: f32 = 0.8;

    /// Horizontal drag needed before a gesture becomes a lane move
    pub const SWIPE_THRESHOLD: f32 = 50.0;

    /// Maximum ticks per trigger replayed after a stall
    pub const MAX_CATCHUP_TICKS: u32 = 8;
}
