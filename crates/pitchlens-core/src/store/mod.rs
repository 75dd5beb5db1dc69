//! Storage abstraction for pitch records.
//!
//! The [`PitchStore`] trait covers everything the pipeline needs from
//! persistence, enabling pluggable backends (SQLite in the application
//! crate, [`memory::InMemoryStore`] for tests).
//!
//! Records are written once under a freshly generated ID and never
//! updated, so implementations need no write coordination beyond the
//! insert itself.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::PitchRecord;

/// Abstract storage backend for pitch records.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`put`](PitchStore::put) | Insert a new record |
/// | [`get`](PitchStore::get) | Point lookup by `pitch_id` |
/// | [`get_many`](PitchStore::get_many) | Lookup several IDs, omitting misses |
#[async_trait]
pub trait PitchStore: Send + Sync {
    /// Insert a record. IDs are unique; re-inserting an ID is an error.
    async fn put(&self, record: &PitchRecord) -> Result<()>;

    /// Retrieve a record by ID.
    async fn get(&self, pitch_id: &str) -> Result<Option<PitchRecord>>;

    /// Retrieve every record whose ID is in `pitch_ids`.
    ///
    /// Missing IDs are silently omitted. Results follow request order.
    async fn get_many(&self, pitch_ids: &[String]) -> Result<Vec<PitchRecord>> {
        let mut found = Vec::with_capacity(pitch_ids.len());
        for id in pitch_ids {
            if let Some(record) = self.get(id).await? {
                found.push(record);
            }
        }
        Ok(found)
    }
}
