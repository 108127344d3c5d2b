//! Best score persistence
//!
//! Features:
//! - Storage port ([`BestScoreStore`]) with memory and file backends
//! - Versioned JSON record
//! - Atomic file replace (tmp → save)
//! - Fire-and-forget writers that never stall the simulation

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod file;
pub mod memory;
pub mod sink;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sink::ThreadedSink;
pub use sink::{InlineSink, ScoreSink};

/// Current on-disk record version
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored record is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported record version {0}")]
    Version(u32),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the best score lives between runs
pub trait BestScoreStore {
    /// Stored best score, `None` if nothing was ever saved
    fn load(&self) -> Result<Option<u32>, StoreError>;
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Serialized form of the best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub version: u32,
    pub best_score: u32,
}

impl ScoreRecord {
    pub fn new(best_score: u32) -> Self {
        Self {
            version: RECORD_VERSION,
            best_score,
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let record: Self = serde_json::from_str(json)?;
        if record.version > RECORD_VERSION {
            return Err(StoreError::Version(record.version));
        }
        Ok(record)
    }
}

/// Startup load: absent or unreadable scores count as 0
pub fn load_best_score(store: &dyn BestScoreStore) -> u32 {
    match store.load() {
        Ok(Some(score)) => {
            log::info!("Loaded best score {}", score);
            score
        }
        Ok(None) => {
            log::info!("No best score found, starting fresh");
            0
        }
        Err(e) => {
            log::warn!("Failed to load best score: {}", e);
            0
        }
    }
}
