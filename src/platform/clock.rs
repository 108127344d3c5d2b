//! Periodic triggers
//!
//! Two independent triggers drive the game: the simulation tick and the spawn
//! decision. A [`Scheduler`] hands out due firings one at a time, in the order
//! they fell due, so a trigger stopped while handling one firing never fires
//! again from the same batch.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCHUP_TICKS;

/// Which periodic trigger fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Simulation,
    Spawn,
}

impl Trigger {
    pub const ALL: [Trigger; 2] = [Trigger::Simulation, Trigger::Spawn];

    fn index(self) -> usize {
        match self {
            Trigger::Simulation => 0,
            Trigger::Spawn => 1,
        }
    }
}

/// Start/stop control over the periodic triggers
pub trait Scheduler {
    /// (Re)start a trigger; its first firing is one period from now
    fn start(&mut self, trigger: Trigger, period: Duration);
    /// Stop a trigger. Pending firings are discarded.
    fn stop(&mut self, trigger: Trigger);
    fn is_running(&self, trigger: Trigger) -> bool;
    /// Next firing that is due, earliest first
    fn poll(&mut self) -> Option<Trigger>;
    /// Time until the earliest running trigger falls due
    fn until_next(&self) -> Option<Duration>;

    fn stop_all(&mut self) {
        for trigger in Trigger::ALL {
            self.stop(trigger);
        }
    }
}

#[derive(Debug, Clone)]
struct PeriodicTimer {
    period: Duration,
    next_due: Duration,
}

/// Scheduler over a logical clock that only moves when told to.
///
/// Tests drive it with [`ManualScheduler::advance`]; hosts with their own frame
/// callback feed it measured frame deltas.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    timers: [Option<PeriodicTimer>; 2],
    /// Most firings per trigger replayed after a long advance (None = unlimited)
    max_catchup: Option<u32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how far a trigger may fall behind before old firings are dropped
    pub fn with_catchup_limit(mut self, max_ticks: u32) -> Self {
        self.max_catchup = Some(max_ticks.max(1));
        self
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the logical clock forward
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;

        let Some(limit) = self.max_catchup else {
            return;
        };
        for (index, timer) in self.timers.iter_mut().enumerate() {
            if let Some(timer) = timer {
                let window = timer.period * limit;
                let behind = self.now.saturating_sub(timer.next_due);
                if behind >= window {
                    // Keep at most `limit` firings pending
                    timer.next_due = self.now - window + timer.period;
                    log::warn!(
                        "Trigger {:?} fell behind by {:?}, dropping stale ticks",
                        Trigger::ALL[index],
                        behind
                    );
                }
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, trigger: Trigger, period: Duration) {
        // Zero periods fire every millisecond
        if period.is_zero() {
            log::warn!("{:?} started with a zero period, using 1ms", trigger);
        }
        let period = period.max(Duration::from_millis(1));
        self.timers[trigger.index()] = Some(PeriodicTimer {
            period,
            next_due: self.now + period,
        });
    }

    fn stop(&mut self, trigger: Trigger) {
        self.timers[trigger.index()] = None;
    }

    fn is_running(&self, trigger: Trigger) -> bool {
        self.timers[trigger.index()].is_some()
    }

    fn poll(&mut self) -> Option<Trigger> {
        // Earliest due first; ties go to the lower index (simulation)
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (i, t.next_due)))
            .filter(|&(_, due)| due <= self.now)
            .min_by_key(|&(i, due)| (due, i))?;

        let timer = self.timers[index].as_mut()?;
        timer.next_due += timer.period;
        Some(Trigger::ALL[index])
    }

    fn until_next(&self) -> Option<Duration> {
        self.timers
            .iter()
            .flatten()
            .map(|t| t.next_due.saturating_sub(self.now))
            .min()
    }
}

/// Scheduler driven by the wall clock
#[derive(Debug)]
pub struct RealtimeScheduler {
    inner: ManualScheduler,
    last: std::time::Instant,
}

impl Default for RealtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self {
            inner: ManualScheduler::new().with_catchup_limit(MAX_CATCHUP_TICKS),
            last: std::time::Instant::now(),
        }
    }

    fn sync(&mut self) {
        let now = std::time::Instant::now();
        self.inner.advance(now - self.last);
        self.last = now;
    }
}

impl Scheduler for RealtimeScheduler {
    fn start(&mut self, trigger: Trigger, period: Duration) {
        self.sync();
        self.inner.start(trigger, period);
    }

    fn stop(&mut self, trigger: Trigger) {
        self.inner.stop(trigger);
    }

    fn is_running(&self, trigger: Trigger) -> bool {
        self.inner.is_running(trigger)
    }

    fn poll(&mut self) -> Option<Trigger> {
        self.sync();
        self.inner.poll()
    }

    fn until_next(&self) -> Option<Duration> {
        let elapsed = self.last.elapsed();
        self.inner.until_next().map(|d| d.saturating_sub(elapsed))
    }
}
