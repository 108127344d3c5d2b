//! Game session: the single consumer of triggers and commands
//!
//! Input can arrive from any thread through a [`CommandSender`]; ticks come
//! from the [`Scheduler`]. The session applies them one at a time, in arrival
//! order, so the engine never sees concurrent mutation. It also owns the
//! trigger lifecycle: both triggers stop on game over and restart on reset.

use std::sync::mpsc::{Receiver, Sender, channel};

use crate::engine::{Command, Engine};
use crate::persistence::ScoreSink;
use crate::platform::{Scheduler, Trigger};
use crate::sim::{GameEvent, GameMode, RandomSource, Snapshot};

/// Cloneable handle for queuing commands from an input thread
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queue a command. Returns false once the session is gone.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

pub struct Session<S: Scheduler, R: RandomSource> {
    engine: Engine<R>,
    scheduler: S,
    sink: Box<dyn ScoreSink>,
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl<S: Scheduler, R: RandomSource> Session<S, R> {
    /// Wrap an engine. Both triggers start if its round is still in play.
    pub fn new(engine: Engine<R>, scheduler: S, sink: Box<dyn ScoreSink>) -> Self {
        let (tx, rx) = channel();
        let mut session = Self {
            engine,
            scheduler,
            sink,
            tx,
            rx,
        };
        if session.engine.mode() == GameMode::Playing {
            session.start_triggers();
        }
        session
    }

    pub fn commands(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Apply a command right away (same-thread input)
    pub fn submit(&mut self, command: Command) -> Vec<GameEvent> {
        let events = self.engine.handle(command);
        self.dispatch(&events);
        events
    }

    /// Apply every queued command and every due trigger firing
    pub fn pump(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.drain_commands(&mut events);
        while let Some(trigger) = self.scheduler.poll() {
            let fired = match trigger {
                Trigger::Simulation => self.engine.sim_tick(),
                Trigger::Spawn => self.engine.spawn_tick(),
            };
            self.dispatch(&fired);
            events.extend(fired);
            self.drain_commands(&mut events);
        }
        events
    }

    fn drain_commands(&mut self, events: &mut Vec<GameEvent>) {
        while let Ok(command) = self.rx.try_recv() {
            let applied = self.engine.handle(command);
            self.dispatch(&applied);
            events.extend(applied);
        }
    }

    /// React to engine events: persistence writes and trigger lifecycle
    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::NewBestScore(score) => self.sink.submit(*score),
                GameEvent::Collision { score, .. } => {
                    self.scheduler.stop_all();
                    log::info!("Game over at score {}", score);
                }
                GameEvent::RoundReset => self.start_triggers(),
                GameEvent::Spawned { .. } | GameEvent::Survived { .. } => {}
            }
        }
    }

    fn start_triggers(&mut self) {
        let config = self.engine.config();
        let (sim, spawn) = (config.sim_period(), config.spawn_period());
        self.scheduler.start(Trigger::Simulation, sim);
        self.scheduler.start(Trigger::Spawn, spawn);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::{BestScoreStore, InlineSink, MemoryStore, load_best_score};
    use crate::platform::ManualScheduler;
    use crate::sim::{Obstacle, Rect, ScriptedSource};
    use std::time::Duration;

    type TestSession = Session<ManualScheduler, ScriptedSource>;

    fn session(store: &MemoryStore, samples: Vec<f32>) -> TestSession {
        let best = load_best_score(store);
        let engine = Engine::new(Config::default(), ScriptedSource::new(samples), Some(best));
        Session::new(
            engine,
            ManualScheduler::new(),
            Box::new(InlineSink::new(store.clone())),
        )
    }

    fn place(session: &mut TestSession, bounds: Rect) {
        let state = session.engine_mut().state_mut();
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle { id, bounds });
    }

    fn run_for(session: &mut TestSession, ms: u64) -> Vec<GameEvent> {
        session.scheduler_mut().advance(Duration::from_millis(ms));
        session.pump()
    }

    #[test]
    fn test_triggers_start_with_session() {
        let session = session(&MemoryStore::new(), vec![0.99]);
        assert!(session.scheduler().is_running(Trigger::Simulation));
        assert!(session.scheduler().is_running(Trigger::Spawn));
    }

    #[test]
    fn test_finished_round_does_not_start_triggers() {
        let mut engine = Engine::new(Config::default(), ScriptedSource::new(vec![0.99]), None);
        engine.state_mut().mode = GameMode::GameOver;
        let mut session = Session::new(
            engine,
            ManualScheduler::new(),
            Box::new(InlineSink::new(MemoryStore::new())),
        );
        assert!(!session.scheduler().is_running(Trigger::Simulation));
        assert!(!session.scheduler().is_running(Trigger::Spawn));
        assert!(run_for(&mut session, 1000).is_empty());

        assert_eq!(session.submit(Command::Reset), vec![GameEvent::RoundReset]);
        assert!(session.scheduler().is_running(Trigger::Simulation));
        assert!(session.scheduler().is_running(Trigger::Spawn));
    }

    #[test]
    fn test_ticks_follow_the_clock() {
        let mut session = session(&MemoryStore::new(), vec![0.0, 0.5, 0.5, 0.5]);
        run_for(&mut session, 29);
        assert_eq!(session.engine().state().ticks, 0);
        run_for(&mut session, 371);
        assert_eq!(session.engine().state().ticks, 13);
        // Spawn fired at 400 after sim tick 13 at 390
        assert_eq!(session.snapshot().obstacles.len(), 1);
        assert_eq!(session.snapshot().obstacles[0].pos.y, 0.0);
        run_for(&mut session, 20);
        assert_eq!(session.snapshot().obstacles[0].pos.y, 6.0);
    }

    #[test]
    fn test_new_best_score_is_persisted() {
        let store = MemoryStore::new();
        let mut session = session(&store, vec![0.99]);
        let height = session.engine().config().playfield_height;
        place(&mut session, Rect::new(0.0, height - 1.0, 40.0, 30.0));

        let events = run_for(&mut session, 30);
        assert!(events.contains(&GameEvent::NewBestScore(1)));
        assert_eq!(store.load().unwrap(), Some(1));
    }

    #[test]
    fn test_best_score_survives_into_new_session() {
        let store = MemoryStore::new();
        {
            let mut session = session(&store, vec![0.99]);
            let height = session.engine().config().playfield_height;
            for i in 0..3 {
                place(&mut session, Rect::new(i as f32 * 10.0, height - 1.0, 10.0, 30.0));
            }
            run_for(&mut session, 30);
        }
        let session = session(&store, vec![0.99]);
        assert_eq!(session.engine().best_score(), 3);
        assert_eq!(session.snapshot().best_score, 3);
    }

    #[test]
    fn test_game_over_stops_triggers_and_reset_restarts_them() {
        let mut session = session(&MemoryStore::new(), vec![0.0, 0.5, 0.5, 0.5]);
        let vehicle = session.snapshot().vehicle;
        place(&mut session, Rect::new(vehicle.left(), vehicle.top(), 40.0, 40.0));

        run_for(&mut session, 90);
        assert_eq!(session.engine().mode(), GameMode::GameOver);
        assert_eq!(session.engine().state().ticks, 1);
        assert!(!session.scheduler().is_running(Trigger::Simulation));
        assert!(!session.scheduler().is_running(Trigger::Spawn));

        let frozen = session.snapshot();
        run_for(&mut session, 5000);
        assert_eq!(session.snapshot(), frozen);

        let commands = session.commands();
        assert!(commands.send(Command::MoveLeft));
        assert!(commands.send(Command::Reset));
        let events = session.pump();
        assert_eq!(events, vec![GameEvent::RoundReset]);
        assert_eq!(session.engine().mode(), GameMode::Playing);
        assert!(session.scheduler().is_running(Trigger::Simulation));

        // Fresh round: first tick one period after reset
        run_for(&mut session, 30);
        assert_eq!(session.engine().state().ticks, 1);
    }

    #[test]
    fn test_queued_commands_apply_before_due_ticks() {
        let mut session = session(&MemoryStore::new(), vec![0.99]);
        let start = session.snapshot().vehicle.left();
        let commands = session.commands();
        let handle = std::thread::spawn(move || {
            commands.send(Command::MoveRight);
            commands.send(Command::MoveRight);
        });
        handle.join().unwrap();
        run_for(&mut session, 30);
        assert_eq!(session.snapshot().vehicle.left(), start + 120.0);
    }

    #[test]
    fn test_reset_while_playing_is_ignored() {
        let mut session = session(&MemoryStore::new(), vec![0.99]);
        run_for(&mut session, 60);
        let before = session.engine().state().clone();
        assert!(session.submit(Command::Reset).is_empty());
        assert_eq!(session.engine().state(), &before);
        assert_eq!(session.scheduler().until_next(), Some(Duration::from_millis(30)));
    }
}
