//! Game tuning
//!
//! Every gameplay constant lives here so rounds can be reshaped from a JSON
//! file without touching the simulation.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Vehicle ===
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    /// Distance from the playfield bottom to the vehicle's top edge
    pub vehicle_bottom_offset: f32,
    pub lane_step: f32,

    // === Obstacles ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,

    // === Spawning ===
    pub spawn_chance_base: f32,
    pub spawn_chance_per_point: f32,
    pub spawn_chance_cap: f32,

    // === Timing ===
    pub sim_period_ms: u64,
    pub spawn_period_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            vehicle_width: VEHICLE_WIDTH,
            vehicle_height: VEHICLE_HEIGHT,
            vehicle_bottom_offset: VEHICLE_BOTTOM_OFFSET,
            lane_step: LANE_STEP,

            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            obstacle_min_width: OBSTACLE_MIN_WIDTH,
            obstacle_max_width: OBSTACLE_MAX_WIDTH,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_max_height: OBSTACLE_MAX_HEIGHT,

            spawn_chance_base: SPAWN_CHANCE_BASE,
            spawn_chance_per_point: SPAWN_CHANCE_PER_POINT,
            spawn_chance_cap: SPAWN_CHANCE_CAP,

            sim_period_ms: SIM_PERIOD_MS,
            spawn_period_ms: SPAWN_PERIOD_MS,
        }
    }
}

impl Config {
    /// Fixed vertical coordinate of the vehicle's top edge
    pub fn vehicle_y(&self) -> f32 {
        self.playfield_height - self.vehicle_bottom_offset
    }

    /// Vehicle x at the start of every round (centered)
    pub fn vehicle_start_x(&self) -> f32 {
        (self.playfield_width / 2.0 - self.vehicle_width / 2.0).clamp(0.0, self.max_vehicle_x())
    }

    /// Rightmost legal vehicle x
    pub fn max_vehicle_x(&self) -> f32 {
        (self.playfield_width - self.vehicle_width).max(0.0)
    }

    /// Rightmost x a freshly spawned obstacle may take
    pub fn max_spawn_x(&self) -> f32 {
        (self.playfield_width - self.obstacle_max_width).max(0.0)
    }

    pub fn sim_period(&self) -> Duration {
        Duration::from_millis(self.sim_period_ms)
    }

    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_period_ms)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("playfield_width", self.playfield_width)?;
        positive("playfield_height", self.playfield_height)?;
        positive("vehicle_width", self.vehicle_width)?;
        positive("vehicle_height", self.vehicle_height)?;
        positive("lane_step", self.lane_step)?;
        positive("initial_speed", self.initial_speed)?;
        positive("obstacle_min_width", self.obstacle_min_width)?;
        positive("obstacle_min_height", self.obstacle_min_height)?;

        if self.vehicle_width > self.playfield_width {
            return Err(ConfigError::Invalid {
                field: "vehicle_width",
                reason: "vehicle is wider than the playfield",
            });
        }
        // Vehicle must sit fully inside the field
        let offset = self.vehicle_bottom_offset;
        if !(self.vehicle_height..=self.playfield_height).contains(&offset) {
            return Err(ConfigError::Invalid {
                field: "vehicle_bottom_offset",
                reason: "must lie in [vehicle_height, playfield_height]",
            });
        }
        if self.speed_increment.is_nan() || self.speed_increment < 0.0 {
            return Err(ConfigError::Invalid {
                field: "speed_increment",
                reason: "speed must never decrease",
            });
        }
        if self.obstacle_max_width < self.obstacle_min_width {
            return Err(ConfigError::Invalid {
                field: "obstacle_max_width",
                reason: "smaller than obstacle_min_width",
            });
        }
        if self.obstacle_max_width > self.playfield_width {
            return Err(ConfigError::Invalid {
                field: "obstacle_max_width",
                reason: "obstacles could spawn past the right edge",
            });
        }
        if self.obstacle_max_height < self.obstacle_min_height {
            return Err(ConfigError::Invalid {
                field: "obstacle_max_height",
                reason: "smaller than obstacle_min_height",
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_chance_base) {
            return Err(ConfigError::Invalid {
                field: "spawn_chance_base",
                reason: "probability outside [0, 1]",
            });
        }
        if self.spawn_chance_per_point.is_nan() || self.spawn_chance_per_point < 0.0 {
            return Err(ConfigError::Invalid {
                field: "spawn_chance_per_point",
                reason: "spawn chance must never decrease",
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_chance_cap) {
            return Err(ConfigError::Invalid {
                field: "spawn_chance_cap",
                reason: "probability outside [0, 1]",
            });
        }
        if self.sim_period_ms == 0 || self.spawn_period_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "sim_period_ms",
                reason: "tick periods must be non-zero",
            });
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
