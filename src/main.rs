//! Lane Dodge entry point
//!
//! Runs a headless demo: the autopilot plays a few rounds in real time
//! against the engine and the best score is kept in a JSON file.
//!
//! Usage: `lane-dodge [config.json] [rounds]`
//! The save file defaults to `lane_dodge_best.json`; override with `LANE_DODGE_SAVE`.

use lane_dodge::autopilot::Autopilot;
use lane_dodge::persistence::{FileStore, InlineSink, ScoreSink, ThreadedSink, load_best_score};
use lane_dodge::platform::{RealtimeScheduler, Scheduler};
use lane_dodge::sim::{GameEvent, GameMode, PcgSource};
use lane_dodge::{Config, Engine, Session};

const DEFAULT_SAVE_PATH: &str = "lane_dodge_best.json";
const DEFAULT_ROUNDS: u32 = 3;

fn load_config(path: Option<String>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config {}: {}", path, e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Lane Dodge starting...");

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next());
    let rounds = args
        .next()
        .and_then(|r| r.parse::<u32>().ok())
        .unwrap_or(DEFAULT_ROUNDS)
        .max(1);

    let save_path =
        std::env::var("LANE_DODGE_SAVE").unwrap_or_else(|_| DEFAULT_SAVE_PATH.to_string());
    let store = FileStore::new(save_path);
    let best = load_best_score(&store);
    let sink: Box<dyn ScoreSink> = match ThreadedSink::spawn(store.clone()) {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            log::warn!("Background writer unavailable ({}), saving inline", e);
            Box::new(InlineSink::new(store))
        }
    };

    let seed = rand::random::<u64>();
    log::info!("Game initialized with seed: {}", seed);
    let engine = Engine::new(config.clone(), PcgSource::new(seed), Some(best));
    let mut session = Session::new(engine, RealtimeScheduler::new(), sink);
    let pilot = Autopilot::new();

    let mut finished = 0;
    let mut last_tick = None;
    loop {
        for event in session.pump() {
            if let GameEvent::Collision { score, .. } = event {
                finished += 1;
                println!("Round {} over: score {}", finished, score);
            }
        }
        if finished >= rounds {
            break;
        }

        // One autopilot decision per simulation tick
        let ticks = session.engine().state().ticks;
        let over = session.engine().mode() == GameMode::GameOver;
        if over || last_tick != Some(ticks) {
            last_tick = Some(ticks);
            if let Some(command) = pilot.decide(&session.snapshot(), &config) {
                session.submit(command);
            }
        }

        if let Some(wait) = session.scheduler().until_next() {
            std::thread::sleep(wait);
        }
    }

    println!("Best score: {}", session.engine().best_score());
    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
    // Dropping the session flushes the background writer
}
