//! In-memory [`PitchStore`] implementation for tests and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::models::PitchRecord;

use super::PitchStore;

/// In-memory store keyed by `pitch_id`.
pub struct InMemoryStore {
    records: RwLock<HashMap<String, PitchRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PitchStore for InMemoryStore {
    async fn put(&self, record: &PitchRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("pitch store lock poisoned"))?;
        if records.contains_key(&record.pitch_id) {
            bail!("duplicate pitch_id: {}", record.pitch_id);
        }
        records.insert(record.pitch_id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, pitch_id: &str) -> Result<Option<PitchRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("pitch store lock poisoned"))?;
        Ok(records.get(pitch_id).cloned())
    }
}
