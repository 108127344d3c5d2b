//! Simulation engine
//!
//! Owns the authoritative round state, the random source and the best score.
//! The round transitions in [`crate::sim::tick`] know nothing about the best
//! score; the engine watches their events and raises
//! [`GameEvent::NewBestScore`] for whoever persists it.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::sim::{self, Direction, GameEvent, GameMode, GameState, RandomSource, Snapshot};

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Start a new round (only while game over)
    Reset,
}

pub struct Engine<R: RandomSource> {
    config: Config,
    state: GameState,
    rng: R,
    best_score: u32,
}

impl<R: RandomSource> Engine<R> {
    /// Create an engine with a fresh round. `stored_best` is whatever the
    /// persistence port returned at startup; absent means 0.
    pub fn new(config: Config, rng: R, stored_best: Option<u32>) -> Self {
        let state = GameState::new(&config);
        let best_score = stored_best.unwrap_or(0);
        log::info!("Engine ready, best score {}", best_score);
        Self {
            config,
            state,
            rng,
            best_score,
        }
    }

    /// Apply one simulation tick
    pub fn sim_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        sim::tick(&mut self.state, &self.config, &mut events);
        self.track_best_score(&mut events);
        events
    }

    /// Apply one spawn decision
    pub fn spawn_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        sim::spawn_tick(&mut self.state, &self.config, &mut self.rng, &mut events);
        events
    }

    /// Apply a player command. Commands that don't fit the current mode are
    /// silently dropped.
    pub fn handle(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match command {
            Command::MoveLeft => {
                sim::move_vehicle(&mut self.state, &self.config, Direction::Left);
            }
            Command::MoveRight => {
                sim::move_vehicle(&mut self.state, &self.config, Direction::Right);
            }
            Command::Reset => {
                sim::reset(&mut self.state, &self.config, &mut events);
            }
        }
        events
    }

    /// Raise the best score after each survival that beats it
    fn track_best_score(&mut self, events: &mut Vec<GameEvent>) {
        let mut raised = Vec::new();
        for event in events.iter() {
            if let GameEvent::Survived { score, .. } = *event {
                if score > self.best_score {
                    self.best_score = score;
                    raised.push(GameEvent::NewBestScore(score));
                }
            }
        }
        events.extend(raised);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.best_score)
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, Rect, ScriptedSource};
    use proptest::prelude::*;

    fn engine(best: Option<u32>) -> Engine<ScriptedSource> {
        Engine::new(Config::default(), ScriptedSource::new(vec![0.5]), best)
    }

    fn place(engine: &mut Engine<ScriptedSource>, bounds: Rect) {
        let state = engine.state_mut();
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle { id, bounds });
    }

    #[test]
    fn test_absent_best_score_is_zero() {
        assert_eq!(engine(None).best_score(), 0);
        assert_eq!(engine(Some(42)).best_score(), 42);
    }

    #[test]
    fn test_survival_raises_best_score() {
        let mut engine = engine(None);
        let height = engine.config().playfield_height;
        place(&mut engine, Rect::new(0.0, height - 1.0, 40.0, 30.0));

        let events = engine.sim_tick();
        assert_eq!(engine.state().score, 1);
        assert!((engine.state().speed - 6.3).abs() < 1e-5);
        assert_eq!(engine.best_score(), 1);
        assert_eq!(events.last(), Some(&GameEvent::NewBestScore(1)));
    }

    #[test]
    fn test_best_score_only_raised_when_beaten() {
        let mut engine = engine(Some(5));
        let height = engine.config().playfield_height;
        place(&mut engine, Rect::new(0.0, height - 1.0, 40.0, 30.0));

        let events = engine.sim_tick();
        assert_eq!(engine.best_score(), 5);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBestScore(_))));
    }

    #[test]
    fn test_one_write_per_point_in_a_tick() {
        let mut engine = engine(None);
        let height = engine.config().playfield_height;
        place(&mut engine, Rect::new(0.0, height - 1.0, 40.0, 30.0));
        place(&mut engine, Rect::new(100.0, height - 2.0, 40.0, 30.0));

        let events = engine.sim_tick();
        let writes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewBestScore(_)))
            .collect();
        assert_eq!(
            writes,
            vec![&GameEvent::NewBestScore(1), &GameEvent::NewBestScore(2)]
        );
        assert!((engine.state().speed - 6.6).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_ignores_everything_but_reset() {
        let mut engine = engine(None);
        let vehicle = engine.state().vehicle.bounds();
        place(&mut engine, Rect::new(vehicle.left(), vehicle.top(), 40.0, 40.0));
        engine.sim_tick();
        assert_eq!(engine.mode(), GameMode::GameOver);

        let frozen = engine.snapshot();
        assert!(engine.sim_tick().is_empty());
        assert!(engine.spawn_tick().is_empty());
        assert!(engine.handle(Command::MoveRight).is_empty());
        assert_eq!(engine.snapshot(), frozen);

        assert_eq!(engine.handle(Command::Reset), vec![GameEvent::RoundReset]);
        assert_eq!(engine.mode(), GameMode::Playing);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().speed, engine.config().initial_speed);
        assert!(engine.state().obstacles.is_empty());
    }

    #[test]
    fn test_reset_keeps_best_score() {
        let mut engine = engine(None);
        let height = engine.config().playfield_height;
        place(&mut engine, Rect::new(0.0, height - 1.0, 40.0, 30.0));
        engine.sim_tick();
        engine.state_mut().mode = GameMode::GameOver;
        engine.handle(Command::Reset);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.best_score(), 1);
    }

    #[test]
    fn test_reset_on_fresh_round_is_noop() {
        let mut engine = engine(Some(3));
        let before = engine.state().clone();
        assert!(engine.handle(Command::Reset).is_empty());
        assert_eq!(engine.state(), &before);
        assert!(engine.handle(Command::Reset).is_empty());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_move_commands() {
        let mut engine = engine(None);
        let start = engine.state().vehicle.x;
        engine.handle(Command::MoveLeft);
        assert_eq!(engine.state().vehicle.x, start - 60.0);
        engine.handle(Command::MoveRight);
        engine.handle(Command::MoveRight);
        assert_eq!(engine.state().vehicle.x, start + 60.0);
    }

    proptest! {
        #[test]
        fn prop_seeded_rounds_keep_invariants(seed in any::<u64>(), steer in proptest::collection::vec(0u8..3, 1..300)) {
            let mut engine = Engine::new(Config::default(), crate::sim::PcgSource::new(seed), None);
            let max_x = engine.config().max_vehicle_x();
            for (i, choice) in steer.into_iter().enumerate() {
                let (score, speed, best) = (engine.state().score, engine.state().speed, engine.best_score());
                match choice {
                    0 => { engine.handle(Command::MoveLeft); }
                    1 => { engine.handle(Command::MoveRight); }
                    _ => {}
                }
                if i % 13 == 0 {
                    engine.spawn_tick();
                }
                engine.sim_tick();
                let state = engine.state();
                prop_assert!(state.vehicle.x >= 0.0 && state.vehicle.x <= max_x);
                prop_assert!(state.score >= score);
                prop_assert!(state.speed >= speed);
                prop_assert!(engine.best_score() >= best);
                prop_assert!(engine.best_score() >= state.score);
            }
        }
    }
}
