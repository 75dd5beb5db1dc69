//! SQLite-backed [`PitchStore`] implementation.
//!
//! Each record is one row in `pitches`; the nested sections, enrichment,
//! and analysis are stored as JSON text columns.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use pitchlens_core::models::PitchRecord;
use pitchlens_core::store::PitchStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &SqliteRow) -> Result<PitchRecord> {
    let pitch_id: String = row.get("pitch_id");
    let sections_json: String = row.get("sections_json");
    let enriched_json: String = row.get("enriched_json");
    let analysis_json: String = row.get("analysis_json");
    let created_at: String = row.get("created_at");

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("bad created_at for pitch {}", pitch_id))?
        .with_timezone(&Utc);

    Ok(PitchRecord {
        filename: row.get("filename"),
        sections: serde_json::from_str(&sections_json)
            .with_context(|| format!("bad sections_json for pitch {}", pitch_id))?,
        enriched_data: serde_json::from_str(&enriched_json)
            .with_context(|| format!("bad enriched_json for pitch {}", pitch_id))?,
        analysis: serde_json::from_str(&analysis_json)
            .with_context(|| format!("bad analysis_json for pitch {}", pitch_id))?,
        created_at,
        pitch_id,
    })
}

#[async_trait]
impl PitchStore for SqliteStore {
    async fn put(&self, record: &PitchRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pitches (pitch_id, filename, sections_json, enriched_json,
                                 analysis_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.pitch_id)
        .bind(&record.filename)
        .bind(serde_json::to_string(&record.sections)?)
        .bind(serde_json::to_string(&record.enriched_data)?)
        .bind(serde_json::to_string(&record.analysis)?)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, pitch_id: &str) -> Result<Option<PitchRecord>> {
        let row = sqlx::query(
            "SELECT pitch_id, filename, sections_json, enriched_json, analysis_json, created_at FROM pitches WHERE pitch_id = ?",
        )
        .bind(pitch_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::run_migrations;
    use pitchlens_core::enrich::enrich;
    use pitchlens_core::models::{AnalysisOutcome, AnalysisResult, Swot};
    use pitchlens_core::segment::segment;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn record(filename: &str) -> PitchRecord {
        PitchRecord::new(
            filename,
            segment("Team\nAlice\nMarket\nHuge"),
            enrich(filename),
            AnalysisResult {
                summary: "A pitch.".to_string(),
                swot: Some(Swot {
                    strengths: "s".to_string(),
                    weaknesses: "w".to_string(),
                    opportunities: "o".to_string(),
                    threats: "t".to_string(),
                }),
                risks: vec!["a".into(), "b".into(), "c".into()],
            },
        )
    }

    #[tokio::test]
    async fn round_trips_record() {
        let store = memory_store().await;
        let r = record("acme.pdf");
        store.put(&r).await.unwrap();

        let back = store.get(&r.pitch_id).await.unwrap().unwrap();
        assert_eq!(back, r);
    }

    #[tokio::test]
    async fn degraded_analysis_round_trips() {
        let store = memory_store().await;
        let mut r = record("broken.pdf");
        r.analysis = AnalysisOutcome::Degraded {
            reason: "timeout".to_string(),
        }
        .into_result();
        store.put(&r).await.unwrap();

        let back = store.get(&r.pitch_id).await.unwrap().unwrap();
        assert!(back.analysis.swot.is_none());
        assert_eq!(back.analysis.risks, vec!["Analysis error: timeout"]);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let store = memory_store().await;
        assert!(store.get("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_many_keeps_request_order_and_drops_misses() {
        let store = memory_store().await;
        let a = record("a.pdf");
        let b = record("b.pdf");
        store.put(&a).await.unwrap();
        store.put(&b).await.unwrap();

        let ids = vec!["ghost".to_string(), b.pitch_id.clone(), a.pitch_id.clone()];
        let found = store.get_many(&ids).await.unwrap();
        let found_ids: Vec<_> = found.iter().map(|r| r.pitch_id.as_str()).collect();
        assert_eq!(found_ids, vec![b.pitch_id.as_str(), a.pitch_id.as_str()]);
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let store = memory_store().await;
        let r = record("a.pdf");
        store.put(&r).await.unwrap();
        assert!(store.put(&r).await.is_err());
    }
}
