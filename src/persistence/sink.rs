//! Fire-and-forget best score writers
//!
//! The session hands every new best score to a [`ScoreSink`]. Sinks never
//! report failure back; a failed write is logged and the game carries on.

use super::BestScoreStore;

pub trait ScoreSink {
    fn submit(&mut self, score: u32);
}

/// Writes synchronously on the caller's thread. Fine for cheap stores
/// such as memory.
#[derive(Debug, Clone)]
pub struct InlineSink<S: BestScoreStore> {
    store: S,
}

impl<S: BestScoreStore> InlineSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BestScoreStore> ScoreSink for InlineSink<S> {
    fn submit(&mut self, score: u32) {
        if let Err(e) = self.store.save(score) {
            log::warn!("Failed to save best score {}: {}", score, e);
        }
    }
}

/// Writes on a background thread so slow storage never delays a tick.
/// Dropping the sink flushes pending writes.
pub struct ThreadedSink {
    tx: Option<std::sync::mpsc::Sender<u32>>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl ThreadedSink {
    pub fn spawn<S>(mut store: S) -> std::io::Result<Self>
    where
        S: BestScoreStore + Send + 'static,
    {
        let (tx, rx) = std::sync::mpsc::channel::<u32>();
        let worker = std::thread::Builder::new()
            .name("best-score-writer".into())
            .spawn(move || {
                while let Ok(mut score) = rx.recv() {
                    // Only the latest pending score matters
                    while let Ok(newer) = rx.try_recv() {
                        score = score.max(newer);
                    }
                    if let Err(e) = store.save(score) {
                        log::warn!("Failed to save best score {}: {}", score, e);
                    }
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

impl ScoreSink for ThreadedSink {
    fn submit(&mut self, score: u32) {
        let sent = self.tx.as_ref().map(|tx| tx.send(score).is_ok());
        if sent != Some(true) {
            log::warn!("Best score writer is gone, dropping score {}", score);
        }
    }
}

impl Drop for ThreadedSink {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the queue drains
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Best score writer panicked");
            }
        }
    }
}
