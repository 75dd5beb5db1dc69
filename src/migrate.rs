use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create the schema. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pitches (
            pitch_id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            sections_json TEXT NOT NULL,
            enriched_json TEXT NOT NULL,
            analysis_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pitches_created_at ON pitches(created_at DESC)")
        .execute(pool)
        .await?;

    info!("schema up to date");
    Ok(())
}
