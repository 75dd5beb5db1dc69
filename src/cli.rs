//! CLI command implementations.
//!
//! Each `run_*` function opens the database, runs one pipeline operation,
//! and prints the result either as readable text or, with `--json`, as the
//! same JSON the HTTP API returns.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use pitchlens_core::analysis::Analyzer;
use pitchlens_core::generation::DisabledModel;
use pitchlens_core::models::{PitchRecord, NO_DATA_EXTRACTED};

use crate::config::Config;
use crate::db;
use crate::inference::build_analyzer;
use crate::migrate;
use crate::pipeline::{Pipeline, PipelineError};
use crate::sqlite_store::SqliteStore;

/// Create the database file and schema.
pub async fn run_init(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;
    pool.close().await;
    println!("Database initialized at {}", config.db.path.display());
    Ok(())
}

async fn open_pipeline(config: &Config, analyzer: Analyzer) -> Result<Pipeline> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;
    Ok(Pipeline::new(Arc::new(SqliteStore::new(pool)), analyzer))
}

/// Read-only commands never call a model.
async fn open_reader(config: &Config) -> Result<Pipeline> {
    open_pipeline(
        config,
        Analyzer::new(Arc::new(DisabledModel), Arc::new(DisabledModel)),
    )
    .await
}

pub async fn run_analyze(config: &Config, path: &Path, json: bool) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pipeline = open_pipeline(config, build_analyzer(&config.models)?).await?;
    let record = pipeline.process_upload(bytes, &filename).await?;
    print_record(&record, json)
}

/// Print a stored record. Exits with status 1 when the ID is unknown.
pub async fn run_get(config: &Config, pitch_id: &str, json: bool) -> Result<()> {
    let pipeline = open_reader(config).await?;
    match pipeline.fetch(pitch_id).await {
        Ok(record) => print_record(&record, json),
        Err(PipelineError::NotFound(id)) => {
            eprintln!("Pitch not found: {}", id);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_compare(config: &Config, pitch_ids: &[String], json: bool) -> Result<()> {
    let pipeline = open_reader(config).await?;
    let records = match pipeline.fetch_many(pitch_ids).await {
        Ok(records) => records,
        Err(PipelineError::NoneFound) => {
            eprintln!("No pitches found for comparison");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{:<38} {:<24} {:<12} {:>5}  {}",
        "PITCH ID", "COMPANY", "FUNDING", "TEAM", "INDUSTRY"
    );
    for r in &records {
        let e = &r.enriched_data;
        println!(
            "{:<38} {:<24} {:<12} {:>5}  {}",
            r.pitch_id, e.company_name, e.funding_raised, e.team_size, e.industry
        );
    }
    Ok(())
}

fn print_record(record: &PitchRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let e = &record.enriched_data;
    println!("--- Pitch ---");
    println!("id:         {}", record.pitch_id);
    println!("file:       {}", record.filename);
    println!("created:    {}", record.created_at.to_rfc3339());
    println!("company:    {} ({}, {})", e.company_name, e.industry, e.location);
    println!("funding:    {}", e.funding_raised);
    println!("team size:  {}", e.team_size);
    println!();

    println!("--- Sections ---");
    print_section("Team", &record.sections.team);
    print_section("Market", &record.sections.market);
    print_section("Product / Traction", &record.sections.product_traction);
    println!();

    let a = &record.analysis;
    println!("--- Analysis ---");
    println!("{}", a.summary);
    if let Some(swot) = &a.swot {
        println!();
        println!("  S: {}", swot.strengths);
        println!("  W: {}", swot.weaknesses);
        println!("  O: {}", swot.opportunities);
        println!("  T: {}", swot.threats);
    }
    println!();
    println!("Risks:");
    for (i, risk) in a.risks.iter().enumerate() {
        println!("  {}. {}", i + 1, risk);
    }
    Ok(())
}

fn print_section(label: &str, text: &str) {
    if text == NO_DATA_EXTRACTED {
        println!("{}: (none)", label);
    } else {
        println!("{}: {}", label, text);
    }
}
