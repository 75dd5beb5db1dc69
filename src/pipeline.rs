//! Upload processing and record retrieval.
//!
//! [`Pipeline::process_upload`] runs the full chain for one deck:
//!
//! ```text
//! bytes ──▶ extract ──▶ segment ──▶ enrich ──▶ analyze ──▶ store.put
//! ```
//!
//! Steps run strictly in sequence. Extraction is CPU-bound and runs on the
//! blocking pool. Analysis never fails the upload; a model failure is
//! persisted as a degraded result.
//!
//! Used by both the CLI (`pitchlens analyze/get/compare`) and the HTTP
//! server.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use pitchlens_core::analysis::Analyzer;
use pitchlens_core::enrich::enrich;
use pitchlens_core::models::PitchRecord;
use pitchlens_core::segment::segment;
use pitchlens_core::store::PitchStore;

use crate::extract::{extract_pdf_text, ExtractError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Only PDF files are allowed")]
    UnsupportedFile(String),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error("Pitch not found")]
    NotFound(String),
    #[error("No pitches found for comparison")]
    NoneFound,
    #[error("store error: {0}")]
    Store(anyhow::Error),
}

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn PitchStore>,
    analyzer: Analyzer,
}

impl Pipeline {
    pub fn new(store: Arc<dyn PitchStore>, analyzer: Analyzer) -> Self {
        Self { store, analyzer }
    }

    /// Extract, segment, enrich, analyze, and persist one uploaded deck.
    ///
    /// Every call creates a new record, even for identical bytes.
    pub async fn process_upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<PitchRecord, PipelineError> {
        if !filename.ends_with(".pdf") {
            return Err(PipelineError::UnsupportedFile(filename.to_string()));
        }

        info!(filename, bytes = bytes.len(), "processing upload");

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {}", e)))??;
        info!(chars = text.chars().count(), "text extracted");

        let sections = segment(&text);
        info!("sections identified");

        let enriched = enrich(filename);
        info!(company = %enriched.company_name, "data enriched");

        let analysis = self.analyzer.analyze(&sections).await.into_result();

        let record = PitchRecord::new(filename, sections, enriched, analysis);
        self.store
            .put(&record)
            .await
            .map_err(PipelineError::Store)?;
        info!(pitch_id = %record.pitch_id, "pitch stored");

        Ok(record)
    }

    /// Fetch one record by ID.
    pub async fn fetch(&self, pitch_id: &str) -> Result<PitchRecord, PipelineError> {
        self.store
            .get(pitch_id)
            .await
            .map_err(PipelineError::Store)?
            .ok_or_else(|| PipelineError::NotFound(pitch_id.to_string()))
    }

    /// Fetch several records for comparison.
    ///
    /// IDs are trimmed and blanks ignored; unknown IDs are dropped. Fails
    /// with [`PipelineError::NoneFound`] only when nothing matched.
    pub async fn fetch_many(&self, pitch_ids: &[String]) -> Result<Vec<PitchRecord>, PipelineError> {
        let ids: Vec<String> = pitch_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        let found = self
            .store
            .get_many(&ids)
            .await
            .map_err(PipelineError::Store)?;

        if found.is_empty() {
            return Err(PipelineError::NoneFound);
        }
        info!(requested = ids.len(), found = found.len(), "pitches fetched for comparison");
        Ok(found)
    }
}

/// Split a comma-separated ID list (`"a, b,,c"` → `["a", "b", "c"]`).
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
