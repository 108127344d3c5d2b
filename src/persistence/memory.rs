//! In-process store. Clones share the same slot, so a second engine built
//! from a clone sees what the first one saved.

use std::sync::{Arc, Mutex};

use super::{BestScoreStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(score))),
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        Ok(*slot)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        *slot = Some(score);
        Ok(())
    }
}
