//! Demo mode - a simple AI that plays the game
//!
//! Looks one lane step left and right of the vehicle and picks the column
//! whose nearest incoming obstacle is furthest away. Good enough to survive a
//! while at low speed, which is all the headless runner needs.

use crate::config::Config;
use crate::engine::Command;
use crate::sim::{GameMode, Rect, Snapshot};

/// Horizontal slack added around the vehicle when checking a column
const SIDE_MARGIN: f32 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    /// Pick the next lane command, or `None` to hold position
    pub fn decide(&self, snapshot: &Snapshot, config: &Config) -> Option<Command> {
        match snapshot.mode {
            GameMode::GameOver => return Some(Command::Reset),
            GameMode::Playing => {}
        }

        let vehicle = snapshot.vehicle;
        let x = vehicle.left();
        let left = (x - config.lane_step).max(0.0);
        let right = (x + config.lane_step).min(config.max_vehicle_x());

        let mut best_gap = clearance(snapshot, vehicle, x);
        let mut choice = None;
        let mut choice_center = f32::NEG_INFINITY;
        for (candidate, command) in [(left, Command::MoveLeft), (right, Command::MoveRight)] {
            if candidate == x {
                continue;
            }
            let gap = clearance(snapshot, vehicle, candidate);
            let center = toward_center(candidate, config);
            // Staying wins ties; between sides prefer the one nearer the center
            if gap > best_gap || (gap == best_gap && choice.is_some() && center > choice_center) {
                best_gap = gap;
                choice = Some(command);
                choice_center = center;
            }
        }
        choice
    }
}

/// Vertical gap to the nearest obstacle still above the vehicle in the column
/// starting at `x`. `f32::INFINITY` when the column is clear.
fn clearance(snapshot: &Snapshot, vehicle: Rect, x: f32) -> f32 {
    let column_left = x - SIDE_MARGIN;
    let column_right = x + vehicle.size.x + SIDE_MARGIN;
    snapshot
        .obstacles
        .iter()
        .filter(|o| o.left() < column_right && o.right() > column_left)
        .filter(|o| o.top() < vehicle.bottom())
        .map(|o| (vehicle.top() - o.bottom()).max(0.0))
        .fold(f32::INFINITY, f32::min)
}

/// Negative distance from the playfield center (higher is closer)
fn toward_center(x: f32, config: &Config) -> f32 {
    -(x - config.vehicle_start_x()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(vehicle_x: f32, obstacles: Vec<Rect>, config: &Config) -> Snapshot {
        Snapshot {
            mode: GameMode::Playing,
            vehicle: Rect::new(
                vehicle_x,
                config.vehicle_y(),
                config.vehicle_width,
                config.vehicle_height,
            ),
            obstacles,
            score: 0,
            best_score: 0,
        }
    }

    #[test]
    fn test_holds_when_clear() {
        let config = Config::default();
        let pilot = Autopilot::new();
        assert_eq!(pilot.decide(&snapshot(170.0, vec![], &config), &config), None);
    }

    #[test]
    fn test_dodges_obstacle_overhead() {
        let config = Config::default();
        let pilot = Autopilot::new();
        // Blocks the center column and the right step
        let overhead = vec![Rect::new(200.0, 500.0, 100.0, 60.0)];
        assert_eq!(
            pilot.decide(&snapshot(170.0, overhead, &config), &config),
            Some(Command::MoveLeft)
        );
    }

    #[test]
    fn test_ignores_obstacles_already_passed() {
        let config = Config::default();
        let pilot = Autopilot::new();
        let passed = vec![Rect::new(170.0, 760.0, 60.0, 40.0)];
        assert_eq!(pilot.decide(&snapshot(170.0, passed, &config), &config), None);
    }

    #[test]
    fn test_resets_after_game_over() {
        let config = Config::default();
        let mut over = snapshot(170.0, vec![], &config);
        over.mode = GameMode::GameOver;
        assert_eq!(Autopilot::new().decide(&over, &config), Some(Command::Reset));
    }
}
